use shared::types::User;

use crate::view::{Element, Node};

pub fn avatar(user: &User) -> Node {
    Element::new("img")
        .class("avatar")
        .attr("src", user.avatar.clone().unwrap_or_default())
        .attr("alt", user.username.clone())
        .into()
}

pub fn user_card(user: &User) -> Node {
    Element::new("section")
        .class("user-card")
        .child(avatar(user))
        .child(Element::new("h2").class("username").text(user.username.clone()))
        .child(Element::new("p").class("email").text(user.email.clone()))
        .child(Element::new("p").class("role").text(user.role.clone()))
        .into()
}
