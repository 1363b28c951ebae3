use shared::types::{Photo, PhotoTransfer, Tag, User};

use super::stars::{MAX_STARS, render_stars};
use super::tags::tag_list;
use super::user::avatar;
use crate::view::{Element, Node};

/// Link to a photo's detail page.
pub fn photo_href(photo_page: &str, photo_id: i64) -> String {
    format!("{}?id={}", photo_page, photo_id)
}

fn author_line(author: Option<&User>) -> Node {
    let line = Element::new("div").class("author");
    match author {
        Some(user) => line
            .child(avatar(user))
            .text(" ")
            .child(Element::new("span").class("username").text(user.username.clone()))
            .into(),
        None => line.into(),
    }
}

fn photo_body(photo: &Photo, author: Option<&User>, tags: &[Tag]) -> Vec<Node> {
    vec![
        Element::new("img")
            .class("photo")
            .attr("src", photo.image.clone())
            .attr("alt", photo.description.clone().unwrap_or_default())
            .into(),
        author_line(author),
        Element::new("p")
            .class("description")
            .text(photo.description.clone().unwrap_or_default())
            .into(),
        render_stars(photo.rating),
        tag_list(tags),
    ]
}

/// A clickable card for the photo grid.
pub fn photo_card(photo: &Photo, author: Option<&User>, tags: &[Tag], photo_page: &str) -> Node {
    Element::new("a")
        .class("photo-card")
        .attr("href", photo_href(photo_page, photo.id))
        .child(
            Element::new("article")
                .attr("data-photo-id", photo.id.to_string())
                .children(photo_body(photo, author, tags)),
        )
        .into()
}

/// Cards using each photo's embedded tags; no per-photo lookups.
pub fn photo_grid(photos: &[Photo], photo_page: &str) -> Vec<Node> {
    photos
        .iter()
        .map(|photo| photo_card(photo, None, &photo.tags, photo_page))
        .collect()
}

/// Buttons 1 to 5 posting `like_value` for the photo.
pub fn rating_form(photo_id: i64) -> Node {
    let mut form = Element::new("form")
        .class("rating-form")
        .attr("data-photo-id", photo_id.to_string());
    for value in 1..=MAX_STARS {
        if value > 1 {
            form = form.text(" ");
        }
        form = form.child(
            Element::new("button")
                .attr("name", "like_value")
                .attr("value", value.to_string())
                .text(value.to_string()),
        );
    }
    form.into()
}

/// The detail view: the card content followed by the rating form. The
/// comment thread lives in its own container.
pub fn photo_detail(photo: &Photo, author: Option<&User>, tags: &[Tag]) -> Node {
    Element::new("section")
        .class("photo-detail")
        .attr("data-photo-id", photo.id.to_string())
        .children(photo_body(photo, author, tags))
        .child(rating_form(photo.id))
        .into()
}

/// Public link to a transformed copy, with its QR code once generated.
pub fn share_link(transfer: &PhotoTransfer) -> Node {
    let mut share = Element::new("div")
        .class("share")
        .attr("data-photo-id", transfer.photo_id.to_string())
        .child(
            Element::new("a")
                .attr("href", transfer.link_url.clone())
                .text(transfer.link_url.clone()),
        );
    if let Some(qr) = &transfer.link_qr {
        share = share.child(Element::new("img").class("qr").attr("src", qr.clone()));
    }
    share.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(rating: Option<f64>) -> Photo {
        Photo {
            id: 12,
            image: "https://img.example/12.jpg".into(),
            description: Some("Harbour at dawn".into()),
            rating,
            tags: vec![Tag::new("sea")],
            user_id: Some(3),
            created_at: None,
            updated_at: None,
        }
    }

    fn author() -> User {
        User {
            id: 3,
            username: "marta".into(),
            email: "marta@example.com".into(),
            avatar: Some("https://img.example/a3.png".into()),
            role: "user".into(),
        }
    }

    #[test]
    fn card_links_to_detail_page() {
        let node = photo_card(&photo(Some(4.0)), Some(&author()), &[], "/templates/photo.html");
        let link = node.as_element().unwrap();
        assert_eq!(link.get_attr("href"), Some("/templates/photo.html?id=12"));
    }

    #[test]
    fn card_shows_author_description_stars_and_tags() {
        let tags = vec![Tag::new("sea"), Tag::new("dawn")];
        let node = photo_card(&photo(Some(3.6)), Some(&author()), &tags, "/p");
        let text = node.to_text();
        assert!(text.contains("marta"));
        assert!(text.contains("Harbour at dawn"));
        assert!(text.contains("★★★★"));
        assert!(text.contains("#sea #dawn"));
        assert_eq!(node.find_by_class("avatar").len(), 1);
    }

    #[test]
    fn missing_fields_render_blank() {
        let bare = Photo {
            id: 1,
            image: String::new(),
            description: None,
            rating: None,
            tags: vec![],
            user_id: None,
            created_at: None,
            updated_at: None,
        };
        let node = photo_card(&bare, None, &[], "/p");
        assert_eq!(node.find_by_class("description")[0].children.len(), 1);
        assert_eq!(node.text_content(), "unrated");
    }

    #[test]
    fn grid_uses_embedded_tags() {
        let nodes = photo_grid(&[photo(None)], "/p");
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].to_text().contains("#sea"));
    }

    #[test]
    fn detail_carries_rating_form() {
        let node = photo_detail(&photo(None), Some(&author()), &[]);
        assert_eq!(node.find_by_tag("button").len(), 5);
        assert!(node.to_text().contains("unrated"));
        assert!(node.find_by_class("comment").is_empty());
    }
}
