/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; config loading is tested next to the
/// loader in `config/config.rs`.
// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------
#[cfg(test)]
mod photo_tests {
    use shared::types::*;

    #[test]
    fn photo_decodes_with_only_an_id() {
        let photo: Photo = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(photo.id, 3);
        assert!(photo.image.is_empty());
        assert!(photo.description.is_none());
        assert!(photo.rating.is_none());
        assert!(photo.tags.is_empty());
    }

    #[test]
    fn null_rating_means_unrated() {
        let photo: Photo =
            serde_json::from_str(r#"{"id": 1, "image": "x.jpg", "rating": null}"#).unwrap();
        assert_eq!(photo.rating, None);
    }

    #[test]
    fn embedded_tags_accept_names_and_objects() {
        let photo: Photo =
            serde_json::from_str(r#"{"id": 1, "tags": ["sea", {"name": "sky"}]}"#).unwrap();
        assert_eq!(photo.tags, vec![Tag::new("sea"), Tag::new("sky")]);
    }

    #[test]
    fn empty_search_has_empty_query() {
        assert_eq!(PhotoSearch::default().to_query(), "");
    }

    #[test]
    fn search_query_skips_unset_filters_and_encodes_keyword() {
        let search = PhotoSearch {
            keyword: Some("old town".to_string()),
            min_rating: Some(3),
            ..Default::default()
        };
        assert_eq!(search.to_query(), "keyword=old+town&min_rating=3");
    }

    #[test]
    fn transform_defaults_match_backend() {
        assert_eq!(
            TransformOptions::default().to_query(),
            "width=300&height=300&crop=fill&angle=0"
        );
    }

    #[test]
    fn transform_optional_parameters_are_appended() {
        let options = TransformOptions {
            effect: Some("sepia".to_string()),
            quality: Some(80),
            ..Default::default()
        };
        assert!(options.to_query().ends_with("&effect=sepia&quality=80"));
    }
}

// ---------------------------------------------------------------------------
// Upload form
// ---------------------------------------------------------------------------
#[cfg(test)]
mod upload_tests {
    use shared::types::*;

    fn upload(tags: &str) -> PhotoUpload {
        PhotoUpload {
            description: String::new(),
            tags: PhotoUpload::parse_tags(tags),
            file_name: "a.png".to_string(),
            content_type: "image/png".to_string(),
            file: vec![1, 2, 3],
        }
    }

    #[test]
    fn tags_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            PhotoUpload::parse_tags(" sea , ,sky,"),
            vec!["sea".to_string(), "sky".to_string()]
        );
    }

    #[test]
    fn tags_field_is_comma_joined() {
        assert_eq!(upload("a, b").tags_field(), "a,b");
    }

    #[test]
    fn five_tags_are_allowed() {
        assert!(upload("a,b,c,d,e").validate().is_ok());
    }

    #[test]
    fn six_tags_are_refused() {
        let err = upload("a,b,c,d,e,f").validate().unwrap_err();
        assert_eq!(err, UploadError::TooManyTags(6));
        assert_eq!(err.to_code(), "TOO_MANY_TAGS");
        assert_eq!(err.to_message(), "You can add up to 5 tags.");
    }

    #[test]
    fn empty_file_is_refused() {
        let mut u = upload("");
        u.file.clear();
        assert_eq!(u.validate(), Err(UploadError::MissingFile));
    }
}

// ---------------------------------------------------------------------------
// Users, comments, tags
// ---------------------------------------------------------------------------
#[cfg(test)]
mod record_tests {
    use shared::types::*;

    #[test]
    fn user_role_defaults_to_user() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "username": "ann", "email": "a@b.c"}"#).unwrap();
        assert_eq!(user.role, "user");
        assert!(user.avatar.is_none());
        assert!(!user.is_moderator());
    }

    #[test]
    fn moderators_and_admins_are_moderators() {
        for role in ["admin", "moderator"] {
            let user: User =
                serde_json::from_value(serde_json::json!({"id": 1, "role": role})).unwrap();
            assert!(user.is_moderator(), "{} should moderate", role);
        }
    }

    #[test]
    fn moderator_rating_rows_decode() {
        let rows: Vec<Rating> = serde_json::from_str(
            r#"[{"id": 1, "image": "x.jpg", "rating": 4.5, "like_id": 101,
                 "like_value": 5, "user_id": 1, "username": "user1"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].like_id, 101);
        assert_eq!(rows[0].like_value, 5);
        assert_eq!(rows[0].username.as_deref(), Some("user1"));
    }

    #[test]
    fn photo_transfer_without_qr_decodes() {
        let transfer: PhotoTransfer = serde_json::from_str(
            r#"{"id": 4, "image": "a.jpg", "link_url": "https://img/t.jpg", "photo_id": 9}"#,
        )
        .unwrap();
        assert!(transfer.link_qr.is_none());
        assert_eq!(transfer.photo_id, 9);
    }

    #[test]
    fn empty_avatar_is_refused() {
        let avatar = AvatarUpload {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            file: Vec::new(),
        };
        assert_eq!(avatar.validate(), Err(UploadError::MissingFile));
    }

    #[test]
    fn new_comment_serializes_numeric_photo_id() {
        let body = serde_json::to_value(NewComment {
            text: "abc".to_string(),
            photo_id: 42,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"text": "abc", "photo_id": 42}));
    }

    #[test]
    fn comment_tolerates_missing_timestamps() {
        let comment: Comment =
            serde_json::from_str(r#"{"id": 1, "photo_id": 2, "user_id": 3, "text": "hi"}"#)
                .unwrap();
        assert!(comment.created_at.is_none());
        assert_eq!(comment.text, "hi");
    }

    #[test]
    fn tag_displays_its_name() {
        assert_eq!(Tag::new("sea").to_string(), "sea");
    }
}

// ---------------------------------------------------------------------------
// Login / signup
// ---------------------------------------------------------------------------
#[cfg(test)]
mod auth_tests {
    use shared::types::*;

    #[test]
    fn login_body_is_url_encoded() {
        let data = LoginData {
            username: "a+b@example.com".to_string(),
            password: "p&w d".to_string(),
        };
        assert_eq!(
            data.to_form_body(),
            "username=a%2Bb%40example.com&password=p%26w+d"
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let data = LoginData {
            username: "ann".to_string(),
            password: String::new(),
        };
        assert_eq!(
            data.validate(),
            Err(LoginError::MissingField("password".to_string()))
        );
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let tokens: TokenPair =
            serde_json::from_str(r#"{"access_token": "a", "refresh_token": "r"}"#).unwrap();
        assert_eq!(tokens.token_type, "bearer");
    }

    #[test]
    fn registration_checks_email_shape() {
        let data = RegistrationData {
            username: "ann".to_string(),
            email: "not-an-email".to_string(),
            hash: "secret".to_string(),
        };
        assert_eq!(data.validate(), Err(RegistrationError::InvalidEmail));
    }

    #[test]
    fn conflict_message_is_the_signup_banner() {
        assert_eq!(
            RegistrationError::AccountExists.to_message(),
            "An account with the same email or username already exists."
        );
        assert!(SIGNUP_SUCCESS_MESSAGE.contains('\n'));
    }
}

// ---------------------------------------------------------------------------
// Error bodies
// ---------------------------------------------------------------------------
#[cfg(test)]
mod error_body_tests {
    use shared::types::*;

    #[test]
    fn detail_string_wins() {
        let e = ErrorResponse::from_body(br#"{"detail": "Photo not found", "message": "x"}"#)
            .unwrap();
        assert_eq!(e.user_message().as_deref(), Some("Photo not found"));
    }

    #[test]
    fn validation_list_is_joined() {
        let e = ErrorResponse::from_body(
            br#"{"detail": [{"msg": "field required"}, {"msg": "value is not a valid integer"}]}"#,
        )
        .unwrap();
        assert_eq!(
            e.user_message().as_deref(),
            Some("field required; value is not a valid integer")
        );
    }

    #[test]
    fn message_field_is_the_fallback() {
        let e = ErrorResponse::from_body(br#"{"message": "Email not confirmed"}"#).unwrap();
        assert_eq!(e.user_message().as_deref(), Some("Email not confirmed"));
    }

    #[test]
    fn non_json_body_has_no_message() {
        assert!(ErrorResponse::from_body(b"<html>502</html>").is_none());
    }
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------
#[cfg(test)]
mod config_struct_tests {
    use shared::types::*;

    #[test]
    fn defaults_point_at_templates() {
        let config = AppConfig::default();
        assert_eq!(config.pages.login, "/templates/login.html");
        assert_eq!(config.pages.home, "/templates/images.html");
        assert_eq!(config.api.photo_list_limit, 50);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://photos.internal:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://photos.internal:9000");
        assert_eq!(config.api.photo_list_limit, 50);
        assert_eq!(config.pages.photo, "/templates/photo.html");
    }

    #[test]
    fn absolute_store_path_is_unchanged() {
        let session = SessionConfig {
            store_path: "/var/lib/photoshare/session.json".to_string(),
        };
        assert_eq!(
            session.expanded_store_path(),
            std::path::PathBuf::from("/var/lib/photoshare/session.json")
        );
    }
}
