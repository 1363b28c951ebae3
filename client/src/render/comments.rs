use shared::types::Comment;

use crate::view::{Element, Node};

pub fn comment_item(comment: &Comment) -> Node {
    let mut meta = format!("user #{}", comment.user_id);
    if let Some(created) = &comment.created_at {
        meta.push_str(" · ");
        meta.push_str(created);
    }

    Element::new("li")
        .class("comment")
        .attr("data-comment-id", comment.id.to_string())
        .child(Element::new("span").class("comment-text").text(comment.text.clone()))
        .text(" ")
        .child(Element::new("span").class("comment-meta").text(meta))
        .into()
}

/// Comments in the order received; never re-sorted.
pub fn comment_list(comments: &[Comment]) -> Node {
    Element::new("ul")
        .class("comments")
        .children(comments.iter().map(comment_item))
        .into()
}
