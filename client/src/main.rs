use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use photoshare::navigation::{Location, RecordingNavigator};
use photoshare::pages::{
    FormOutcome, HomePage, LoginPage, PageContext, PageState, PhotoPage, SearchPage, SignupPage,
    UploadPage, UserPage, logout, read_avatar, read_upload, refresh_session,
};
use photoshare::session::FileStore;
use photoshare::transport::HyperTransport;
use photoshare::view::Node;
use shared::config::load_config_or_default;
use shared::types::{AppConfig, LoginData, RegistrationData, TransformOptions};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// TOML config file; defaults apply when it does not exist.
    #[arg(long, default_value = "photoshare.toml")]
    config: String,

    /// Print HTML instead of text.
    #[arg(long)]
    html: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session tokens.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "PHOTOSHARE_PASSWORD")]
        password: String,
    },
    /// Create an account.
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PHOTOSHARE_PASSWORD")]
        password: String,
    },
    /// Log out and forget the session.
    Logout,
    /// Trade the stored refresh token for new tokens.
    Refresh,
    /// Photos of every user.
    Photos {
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// One photo with its comments.
    Photo { id: i64 },
    /// A user's profile and photos.
    User {
        #[arg(long, conflicts_with = "id")]
        username: Option<String>,
        #[arg(long)]
        id: Option<i64>,
    },
    /// Your own profile and photos.
    Me,
    /// Replace your avatar.
    Avatar { file: PathBuf },
    /// Comment on a photo.
    Comment { photo_id: i64, text: String },
    /// Change the text of one of your comments.
    EditComment {
        photo_id: i64,
        comment_id: i64,
        text: String,
    },
    /// Delete a comment (moderators).
    DeleteComment { photo_id: i64, comment_id: i64 },
    /// Rate a photo from 1 to 5.
    Rate { photo_id: i64, value: u8 },
    /// Every vote on a photo (moderators).
    Ratings { photo_id: i64 },
    /// Delete one vote (moderators).
    DeleteRating { photo_id: i64, like_id: i64 },
    /// Change a photo's description.
    Describe { photo_id: i64, description: String },
    /// Delete a photo.
    DeletePhoto { photo_id: i64 },
    /// Request a transformed copy of a photo.
    Transform {
        photo_id: i64,
        #[arg(long, default_value_t = 300)]
        width: u32,
        #[arg(long, default_value_t = 300)]
        height: u32,
        #[arg(long, default_value = "fill")]
        crop: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        angle: i32,
        #[arg(long)]
        effect: Option<String>,
        #[arg(long)]
        quality: Option<u32>,
        #[arg(long)]
        format: Option<String>,
    },
    /// Share link and QR code for a transformed photo (moderators).
    Share { photo_id: i64, transfer_id: i64 },
    /// Upload a photo.
    Upload {
        file: PathBuf,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma separated, at most five.
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Search photos.
    Search {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        tag_id: Option<i64>,
        #[arg(long)]
        min_rating: Option<u8>,
        #[arg(long)]
        max_rating: Option<u8>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Every tag in use.
    Tags,
    /// Create a tag.
    TagAdd { name: String },
    /// Delete a tag.
    TagDelete { name: String },
}

struct App {
    config: AppConfig,
    store: Arc<FileStore>,
    navigator: Arc<RecordingNavigator>,
    transport: HyperTransport,
    html: bool,
}

impl App {
    fn context(&self, location: Location) -> PageContext {
        PageContext::new(
            self.config.clone(),
            self.store.clone(),
            self.navigator.clone(),
            location,
        )
    }

    fn print(&self, view: &Node) {
        let out = if self.html { view.to_html() } else { view.to_text() };
        if !out.is_empty() {
            println!("{}", out);
        }
    }

    fn print_state(&self, state: &PageState) {
        if let PageState::Error(message) = state {
            eprintln!("error: {}", message);
        }
    }

    fn print_outcome(&self, outcome: &FormOutcome) {
        match outcome {
            FormOutcome::Navigated(_) => {}
            FormOutcome::Message(message) => println!("{}", message.text),
        }
    }

    /// Where the run ended up, if anything navigated.
    fn print_navigation(&self) {
        if let Some(location) = self.navigator.last() {
            println!("-> {}", location);
            if let Some(message) = location.message() {
                println!("{}", message);
            }
        }
    }
}

/// Open and load the detail page of a photo. Forms only run when it rendered.
async fn photo_page(app: &App, photo_id: i64) -> Result<PhotoPage<HyperTransport>> {
    let location = Location::new(&app.config.pages.photo).with_param("id", photo_id.to_string());
    let mut page = PhotoPage::open(app.context(location), app.transport.clone());
    page.load().await.context("Failed to load photo")?;
    Ok(page)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    let store_path = config.session.expanded_store_path();
    let store = FileStore::open(&store_path)
        .with_context(|| format!("Failed to open session store {}", store_path.display()))?;
    let base_url = config.api.resolved_base_url();
    info!("Using API at {}", base_url);

    let transport = HyperTransport::new(&base_url).context("Failed to build HTTP client")?;

    let app = App {
        transport,
        store: Arc::new(store),
        navigator: Arc::new(RecordingNavigator::new()),
        html: cli.html,
        config,
    };

    run(&app, cli.command).await?;
    app.print_navigation();
    Ok(())
}

async fn run(app: &App, command: Command) -> Result<()> {
    let pages = app.config.pages.clone();
    let transport = app.transport.clone();

    match command {
        Command::Login { username, password } => {
            let mut page = LoginPage::open(app.context(Location::new(&pages.login)), transport);
            let outcome = page
                .submit(&LoginData { username, password })
                .await
                .context("Login failed")?;
            app.print_outcome(&outcome);
        }
        Command::Signup {
            username,
            email,
            password,
        } => {
            let mut page = SignupPage::open(app.context(Location::new(&pages.signup)), transport);
            let data = RegistrationData {
                username,
                email,
                hash: password,
            };
            let outcome = page.submit(&data).await.context("Signup failed")?;
            app.print_outcome(&outcome);
        }
        Command::Logout => {
            logout(&app.context(Location::new(&pages.home)), transport).await;
        }
        Command::Refresh => {
            let refreshed = refresh_session(&app.context(Location::new(&pages.home)), transport)
                .await
                .context("Token refresh failed")?;
            if refreshed {
                println!("Session refreshed.");
            }
        }
        Command::Photos { offset } => {
            let location = Location::new(&pages.home).with_param("offset", offset.to_string());
            let mut page = HomePage::open(app.context(location), transport);
            page.load().await.context("Failed to load photos")?;
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::Photo { id } => {
            let location = Location::new(&pages.photo).with_param("id", id.to_string());
            let mut page = PhotoPage::open(app.context(location), transport);
            page.load().await.context("Failed to load photo")?;
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::User { username, id } => {
            let mut location = Location::new(&pages.user);
            if let Some(username) = username {
                location = location.with_param("username", username);
            } else if let Some(id) = id {
                location = location.with_param("id", id.to_string());
            }
            let mut page = UserPage::open(app.context(location), transport);
            page.load().await.context("Failed to load user")?;
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::Me => {
            let mut page = UserPage::open(app.context(Location::new(&pages.user)), transport);
            page.load().await.context("Failed to load profile")?;
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::Avatar { file } => {
            let avatar = read_avatar(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut page = UserPage::open(app.context(Location::new(&pages.user)), transport);
            let outcome = page
                .update_avatar(&avatar)
                .await
                .context("Avatar update failed")?;
            app.print_outcome(&outcome);
        }
        Command::Comment { photo_id, text } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                page.submit_comment(&text)
                    .await
                    .context("Failed to post comment")?;
            }
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::EditComment {
            photo_id,
            comment_id,
            text,
        } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                page.edit_comment(comment_id, &text)
                    .await
                    .context("Failed to edit comment")?;
            }
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::DeleteComment {
            photo_id,
            comment_id,
        } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                page.delete_comment(comment_id)
                    .await
                    .context("Failed to delete comment")?;
            }
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::Rate { photo_id, value } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                page.rate(value).await.context("Failed to rate photo")?;
            }
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::Ratings { photo_id } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                page.view_ratings()
                    .await
                    .context("Failed to load ratings")?;
            }
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::DeleteRating { photo_id, like_id } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                page.delete_rating(like_id)
                    .await
                    .context("Failed to delete rating")?;
            }
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::Describe {
            photo_id,
            description,
        } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                page.update_description(&description)
                    .await
                    .context("Failed to update description")?;
            }
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::DeletePhoto { photo_id } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                let outcome = page
                    .delete_photo()
                    .await
                    .context("Failed to delete photo")?;
                app.print_outcome(&outcome);
            }
            app.print_state(page.state());
        }
        Command::Transform {
            photo_id,
            width,
            height,
            crop,
            angle,
            effect,
            quality,
            format,
        } => {
            let options = TransformOptions {
                width,
                height,
                crop,
                angle,
                effect,
                quality,
                format,
            };
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                let outcome = page
                    .transform(&options)
                    .await
                    .context("Failed to transform photo")?;
                app.print_outcome(&outcome);
            }
            app.print_state(page.state());
        }
        Command::Share {
            photo_id,
            transfer_id,
        } => {
            let mut page = photo_page(app, photo_id).await?;
            if page.state() == &PageState::Rendered {
                page.share(transfer_id)
                    .await
                    .context("Failed to create share link")?;
            }
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::Upload {
            file,
            description,
            tags,
        } => {
            let upload = read_upload(&file, &description, &tags)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut page = UploadPage::open(app.context(Location::new(&pages.home)), transport);
            let outcome = page.submit(&upload).await.context("Upload failed")?;
            app.print_outcome(&outcome);
        }
        Command::Search {
            keyword,
            tag_id,
            min_rating,
            max_rating,
            limit,
            offset,
        } => {
            let mut location = Location::new(&pages.home);
            let params = [
                ("keyword", keyword),
                ("tag_id", tag_id.map(|v| v.to_string())),
                ("min_rating", min_rating.map(|v| v.to_string())),
                ("max_rating", max_rating.map(|v| v.to_string())),
                ("limit", limit.map(|v| v.to_string())),
                ("offset", offset.map(|v| v.to_string())),
            ];
            for (key, value) in params {
                if let Some(value) = value {
                    location = location.with_param(key, value);
                }
            }
            let mut page = SearchPage::open(app.context(location), transport);
            page.load().await.context("Search failed")?;
            app.print_state(page.state());
            app.print(&page.view());
        }
        Command::Tags => {
            let mut page = SearchPage::open(app.context(Location::new(&pages.home)), transport);
            page.load_tags().await.context("Failed to load tags")?;
            app.print_state(page.state());
            app.print(&page.tags().to_node());
        }
        Command::TagAdd { name } => {
            let mut page = SearchPage::open(app.context(Location::new(&pages.home)), transport);
            page.load_tags().await.context("Failed to load tags")?;
            let outcome = page.create_tag(&name).await.context("Failed to create tag")?;
            app.print_outcome(&outcome);
            app.print(&page.tags().to_node());
        }
        Command::TagDelete { name } => {
            let mut page = SearchPage::open(app.context(Location::new(&pages.home)), transport);
            let outcome = page.delete_tag(&name).await.context("Failed to delete tag")?;
            app.print_outcome(&outcome);
        }
    }
    Ok(())
}
