//! Committed items, oldest first

use quill_core::Item;

/// Append-only list of committed items with undo from the end
#[derive(Clone, Debug, Default)]
pub struct History {
    items: Vec<Item>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove and return the most recent item
    pub fn pop(&mut self) -> Option<Item> {
        self.items.pop()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{Color, Drawing, DrawingStyle, InkKind, Point};

    fn item(x: f32) -> Item {
        let style = DrawingStyle::default();
        let drawing = Drawing::from_points(
            vec![Point::at(x, 0.0)],
            Color::BLACK,
            InkKind::Draw,
            1.0,
            false,
            false,
        );
        Item::new(style, drawing)
    }

    #[test]
    fn undo_pops_newest() {
        let mut history = History::new();
        assert!(history.pop().is_none());
        history.push(item(1.0));
        history.push(item(2.0));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pop(), Some(item(2.0)));
        assert_eq!(history.items(), &[item(1.0)]);
        history.clear();
        assert!(history.is_empty());
    }
}
