pub mod client_config;
pub mod comment;
pub mod json_error;
pub mod login;
pub mod photo;
pub mod register;
pub mod tag;
pub mod user;

pub use self::client_config::{ApiConfig, AppConfig, ConfigError, PagesConfig, SessionConfig};
pub use self::comment::{Comment, CommentUpdate, NewComment};
pub use self::json_error::ErrorResponse;
pub use self::login::{LoginData, LoginError, TokenPair};
pub use self::photo::{
    MAX_UPLOAD_TAGS, Photo, PhotoSearch, PhotoTransfer, PhotoUpload, Rating, TransformOptions,
    TransformedPhoto, UploadError,
};
pub use self::register::{
    RegistrationData, RegistrationError, SIGNUP_CONFLICT_MESSAGE, SIGNUP_SUCCESS_MESSAGE,
};
pub use self::tag::Tag;
pub use self::user::{AvatarUpload, User};
