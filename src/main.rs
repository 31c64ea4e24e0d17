use iced::widget::image::Handle;
use iced::widget::{
    button, column, container, horizontal_space, row, scrollable, stack, text, text_input,
};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::PathBuf;

mod auth;
mod config;
mod error;
mod state;
mod store;
mod thumbnail;
mod ui;

use state::gallery::GalleryState;
use state::index::LocalImageIndex;
use store::ObjectStore;

/// A picked file after the background read + thumbnail derivation.
#[derive(Debug, Clone)]
pub struct PreparedUpload {
    pub thumbnail: Vec<u8>,
    pub blob: Vec<u8>,
}

/// Main application state
struct Gallery {
    /// The signed-in user, if any; the gallery only mounts once signed in
    session: Option<auth::Session>,
    /// Username being typed into the sign-in form
    username_input: String,
    /// The gallery state manager
    state: GalleryState,
    /// Remote object store client
    store: ObjectStore,
    /// Decoded thumbnail handles keyed by record key
    thumbnails: HashMap<String, Handle>,
    /// Remote-resolved full image for the expanded record, once available
    expanded_full: Option<Handle>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    UsernameChanged(String),
    SignIn,
    SignOut,
    /// User clicked the "Upload Images" button
    UploadImages,
    /// Background read + thumbnail derivation finished for one file
    UploadPrepared(String, Result<PreparedUpload, String>),
    /// Remote `put` finished for one record
    UploadStored(String, Result<(), String>),
    BeginEdit(String),
    CaptionChanged(String, String),
    SaveEdit(String),
    DeleteImage(String),
    RemoteDeleteFinished(String, Result<(), String>),
    ExpandImage(String),
    /// Remote `resolve` finished for the expanded record
    FullImageResolved(String, Result<PathBuf, String>),
    CloseViewer,
}

impl Gallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = config::Config::load();
        let state = GalleryState::new(LocalImageIndex::load(config::snapshot_path()));
        let store = ObjectStore::new(config.remote_root.clone());
        let session = auth::Session::restore(&config::session_path());

        let thumbnails = state
            .records()
            .iter()
            .map(|record| {
                (
                    record.key.clone(),
                    Handle::from_bytes(record.thumbnail.clone()),
                )
            })
            .collect();

        let image_count = state.records().len();
        println!("🐄 Cowshed initialized with {} images", image_count);

        (
            Gallery {
                session,
                username_input: String::new(),
                state,
                store,
                thumbnails,
                expanded_full: None,
                status: format!("Ready. {} images in gallery.", image_count),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UsernameChanged(value) => {
                self.username_input = value;
                Task::none()
            }
            Message::SignIn => {
                if let Some(session) =
                    auth::Session::sign_in(&self.username_input, &config::session_path())
                {
                    println!("🔑 Signed in as {}", session.username);
                    self.session = Some(session);
                    self.username_input.clear();
                }
                Task::none()
            }
            Message::SignOut => {
                auth::Session::sign_out(&config::session_path());
                self.session = None;
                self.state.collapse();
                self.expanded_full = None;
                Task::none()
            }
            Message::UploadImages => {
                // Show the native multi-file picker dialog
                let files = FileDialog::new()
                    .set_title("Select Images to Upload")
                    .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
                    .pick_files();

                let Some(paths) = files else {
                    return Task::none();
                };

                let mut tasks = Vec::new();
                for path in paths {
                    let filename = path
                        .file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_else(|| String::from("image"));

                    // Reserve the key up front so the grid shows a pending
                    // placeholder and later completions attach by identity
                    let key = self.state.reserve_key(&filename);
                    tasks.push(Task::perform(prepare_upload(path), move |result| {
                        Message::UploadPrepared(key.clone(), result)
                    }));
                }

                self.status = format!("Uploading {} file(s)...", tasks.len());
                Task::batch(tasks)
            }
            Message::UploadPrepared(key, Ok(prepared)) => {
                let PreparedUpload { thumbnail, blob } = prepared;

                let Some(caption) = self
                    .state
                    .complete_upload(&key, thumbnail.clone())
                    .map(|record| record.caption.clone())
                else {
                    // The upload was abandoned before its thumbnail arrived
                    return Task::none();
                };

                self.thumbnails
                    .insert(key.clone(), Handle::from_bytes(thumbnail));
                self.status = format!("✅ Uploaded {}", caption);

                // Mirror the blob to the remote store in the background;
                // local state never waits on it
                let store = self.store.clone();
                let put_key = key.clone();
                Task::perform(
                    async move {
                        store
                            .put(&put_key, &blob)
                            .await
                            .map_err(|err| err.to_string())
                    },
                    move |result| Message::UploadStored(key.clone(), result),
                )
            }
            Message::UploadPrepared(key, Err(err)) => {
                if let Some(upload) = self.state.fail_upload(&key) {
                    log::warn!("skipping {}: {}", upload.filename, err);
                    self.status = format!("⚠️ Skipped {}: {}", upload.filename, err);
                }
                Task::none()
            }
            Message::UploadStored(key, Ok(())) => {
                self.state.mark_synced(&key);
                Task::none()
            }
            Message::UploadStored(key, Err(err)) => {
                log::warn!("remote put failed for {}: {}", key, err);
                self.state.mark_sync_failed(&key);
                self.status = String::from("⚠️ Sync failed for one image (kept locally)");
                Task::none()
            }
            Message::BeginEdit(key) => {
                self.state.begin_edit(&key);
                Task::none()
            }
            Message::CaptionChanged(key, value) => {
                self.state.change_caption(&key, value);
                Task::none()
            }
            Message::SaveEdit(key) => {
                self.state.save_edit(&key);
                Task::none()
            }
            Message::DeleteImage(key) => {
                if !self.state.delete_image(&key) {
                    return Task::none();
                }
                self.thumbnails.remove(&key);
                if self.state.expanded().is_none() {
                    self.expanded_full = None;
                }
                self.status = String::from("Image deleted.");

                // Best-effort remote delete; the optimistic local removal
                // stands either way
                let store = self.store.clone();
                let delete_key = key.clone();
                Task::perform(
                    async move {
                        store
                            .delete(&delete_key)
                            .await
                            .map_err(|err| err.to_string())
                    },
                    move |result| Message::RemoteDeleteFinished(key.clone(), result),
                )
            }
            Message::RemoteDeleteFinished(key, result) => {
                if let Err(err) = result {
                    log::warn!(
                        "remote delete failed for {}: {} (object may linger remotely)",
                        key,
                        err
                    );
                }
                Task::none()
            }
            Message::ExpandImage(key) => {
                self.state.expand(&key);
                if self.state.expanded() != Some(key.as_str()) {
                    return Task::none();
                }

                // Show the local thumbnail now; swap in the remote-resolved
                // full image if it turns up while still expanded
                self.expanded_full = None;
                let store = self.store.clone();
                let resolve_key = key.clone();
                Task::perform(
                    async move {
                        store
                            .resolve(&resolve_key)
                            .await
                            .map_err(|err| err.to_string())
                    },
                    move |result| Message::FullImageResolved(key.clone(), result),
                )
            }
            Message::FullImageResolved(key, result) => {
                if self.state.expanded() == Some(key.as_str()) {
                    match result {
                        Ok(path) => self.expanded_full = Some(Handle::from_path(path)),
                        Err(err) => log::debug!("showing thumbnail for {}: {}", key, err),
                    }
                }
                Task::none()
            }
            Message::CloseViewer => {
                self.state.collapse();
                self.expanded_full = None;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match &self.session {
            None => self.sign_in_view(),
            Some(session) => self.gallery_view(session),
        }
    }

    fn sign_in_view(&self) -> Element<Message> {
        let form = column![
            text("Welcome to Cowshed").size(40),
            text("Sign in to see your gallery").size(16),
            text_input("Username", &self.username_input)
                .on_input(Message::UsernameChanged)
                .on_submit(Message::SignIn)
                .width(Length::Fixed(240.0))
                .padding(10),
            button("Sign In").on_press(Message::SignIn).padding(10),
        ]
        .spacing(20)
        .align_x(Alignment::Center);

        container(form)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn gallery_view(&self, session: &auth::Session) -> Element<Message> {
        let header = row![
            text(format!("Welcome, {}", session.username)).size(16),
            horizontal_space(),
            button(text("Sign Out").size(13)).on_press(Message::SignOut),
        ]
        .align_y(Alignment::Center);

        let content = column![
            header,
            text("Your Image Gallery").size(40),
            button("Upload Images")
                .on_press(Message::UploadImages)
                .padding(10),
            text(&self.status).size(14),
            scrollable(ui::grid::image_grid(
                self.state.records(),
                self.state.pending(),
                &self.thumbnails,
            ))
            .height(Length::Fill),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .padding(20);

        let base = container(content).width(Length::Fill).height(Length::Fill);

        if let Some(key) = self.state.expanded() {
            let handle = self
                .expanded_full
                .clone()
                .or_else(|| self.thumbnails.get(key).cloned());
            if let Some(handle) = handle {
                return stack![base, ui::viewer::overlay(handle)].into();
            }
        }

        base.into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Read a picked file and derive its thumbnail off the UI thread.
///
/// The original blob is kept alongside the thumbnail so the upload to the
/// remote store does not have to read the file again.
async fn prepare_upload(path: PathBuf) -> Result<PreparedUpload, String> {
    let blob = tokio::fs::read(&path)
        .await
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;

    let thumbnail = thumbnail::derive(blob.clone()).await?;

    Ok(PreparedUpload { thumbnail, blob })
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Cowshed Image Gallery", Gallery::update, Gallery::view)
        .theme(Gallery::theme)
        .centered()
        .run_with(Gallery::new)
}
