use shared::types::Rating;

use crate::view::{Element, Node};

pub const STAR_GLYPH: &str = "★";
/// Label shown instead of stars for a photo nobody has rated.
pub const UNRATED_LABEL: &str = "unrated";
pub const MAX_STARS: usize = 5;

/// Filled stars for an average rating: the nearest integer, halves rounding
/// up, clamped to 0..=5. `None` is zero stars.
pub fn star_count(rating: Option<f64>) -> usize {
    match rating {
        Some(r) if r.is_finite() => r.round().clamp(0.0, MAX_STARS as f64) as usize,
        _ => 0,
    }
}

pub fn render_stars(rating: Option<f64>) -> Node {
    let container = Element::new("div").class("rating");
    match rating {
        None => container
            .child(Element::new("span").class("unrated").text(UNRATED_LABEL))
            .into(),
        Some(value) => container
            .attr("title", format!("{:.2}", value))
            .children(
                (0..star_count(rating))
                    .map(|_| Element::new("span").class("star").text(STAR_GLYPH)),
            )
            .into(),
    }
}

/// One vote: who cast it and its stars. The element id carries the vote id
/// so a moderator can remove it.
pub fn vote_item(rating: &Rating) -> Node {
    let voter = match (&rating.username, rating.user_id) {
        (Some(name), _) => name.clone(),
        (None, Some(id)) => format!("user #{}", id),
        (None, None) => String::new(),
    };
    Element::new("li")
        .class("vote")
        .id(&format!("rating-{}", rating.like_id))
        .child(Element::new("span").class("voter").text(voter))
        .child(render_stars(Some(f64::from(rating.like_value))))
        .into()
}

pub fn vote_list(ratings: &[Rating]) -> Node {
    Element::new("ul")
        .class("votes")
        .children(ratings.iter().map(vote_item))
        .into()
}
