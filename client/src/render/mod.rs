//! Pure functions from API records to view trees.
//!
//! No renderer validates its input: missing optional fields come out blank.

pub mod banner;
pub mod comments;
pub mod photo;
pub mod stars;
pub mod tags;
pub mod user;

pub use banner::{FormMessage, MessageKind, form_message, message_banner};
pub use comments::{comment_item, comment_list};
pub use photo::{photo_card, photo_detail, photo_grid, photo_href, rating_form, share_link};
pub use stars::{UNRATED_LABEL, render_stars, star_count, vote_item, vote_list};
pub use tags::{tag_chip, tag_list};
pub use user::user_card;
