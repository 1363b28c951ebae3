use shared::types::Tag;

use crate::view::{Element, Node};

pub fn tag_chip(tag: &Tag) -> Node {
    Element::new("span")
        .class("tag")
        .text(format!("#{}", tag.name))
        .into()
}

/// Chips separated by spaces; an empty list renders an empty container.
pub fn tag_list(tags: &[Tag]) -> Node {
    let mut list = Element::new("div").class("tags");
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            list = list.text(" ");
        }
        list = list.child(tag_chip(tag));
    }
    list.into()
}
