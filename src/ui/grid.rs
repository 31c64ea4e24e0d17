//! The thumbnail grid.
//!
//! One card per record: clickable thumbnail, caption (read-only text or an
//! active input depending on the edit state), edit/save toggle, delete
//! button and a sync badge. Uploads still waiting for their thumbnail show
//! a placeholder card.

use iced::widget::{button, column, container, image, mouse_area, row, text, text_input};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;
use std::collections::HashMap;

use crate::state::data::{ImageRecord, SyncState};
use crate::state::gallery::PendingUpload;
use crate::Message;

const THUMBNAIL_WIDTH: f32 = 150.0;
const CARD_WIDTH: f32 = 170.0;

/// Build the grid for the current records and pending uploads.
pub fn image_grid<'a>(
    records: &'a [ImageRecord],
    pending: &'a [PendingUpload],
    thumbnails: &HashMap<String, image::Handle>,
) -> Element<'a, Message> {
    if records.is_empty() && pending.is_empty() {
        return container(text("No images to display.").size(16))
            .padding(40)
            .into();
    }

    let mut cards: Vec<Element<'a, Message>> = Vec::new();
    for record in records {
        cards.push(record_card(record, thumbnails.get(&record.key)));
    }
    for upload in pending {
        cards.push(pending_card(upload));
    }

    Wrap::with_elements(cards)
        .spacing(16.0)
        .line_spacing(16.0)
        .into()
}

fn record_card<'a>(
    record: &'a ImageRecord,
    handle: Option<&image::Handle>,
) -> Element<'a, Message> {
    let key = record.key.clone();

    let picture: Element<'a, Message> = match handle {
        Some(handle) => mouse_area(image(handle.clone()).width(Length::Fixed(THUMBNAIL_WIDTH)))
            .on_press(Message::ExpandImage(key.clone()))
            .into(),
        // Handles are rebuilt from the snapshot at startup, so this only
        // shows if the thumbnail bytes fail to decode.
        None => text("(no preview)").size(14).into(),
    };

    let caption: Element<'a, Message> = if record.is_editing() {
        let input_key = key.clone();
        text_input("Enter a caption", record.display_caption())
            .on_input(move |value| Message::CaptionChanged(input_key.clone(), value))
            .on_submit(Message::SaveEdit(key.clone()))
            .width(Length::Fixed(THUMBNAIL_WIDTH))
            .size(14)
            .into()
    } else {
        text(record.display_caption())
            .width(Length::Fixed(THUMBNAIL_WIDTH))
            .size(14)
            .into()
    };

    let edit_toggle = if record.is_editing() {
        button(text("Save").size(13)).on_press(Message::SaveEdit(key.clone()))
    } else {
        button(text("Edit").size(13)).on_press(Message::BeginEdit(key.clone()))
    };

    let controls = row![
        edit_toggle,
        button(text("Delete").size(13)).on_press(Message::DeleteImage(key)),
    ]
    .spacing(8);

    let mut card = column![picture, caption, controls]
        .spacing(8)
        .align_x(Alignment::Center)
        .width(Length::Fixed(CARD_WIDTH));

    match record.sync {
        SyncState::Pending => card = card.push(text("syncing...").size(12)),
        SyncState::Failed => card = card.push(text("⚠️ sync failed").size(12)),
        SyncState::Synced => {}
    }

    container(card).padding(8).into()
}

fn pending_card<'a>(upload: &'a PendingUpload) -> Element<'a, Message> {
    container(
        column![
            text("Uploading...").size(14),
            text(&upload.filename).size(12),
        ]
        .spacing(8)
        .align_x(Alignment::Center)
        .width(Length::Fixed(CARD_WIDTH)),
    )
    .padding(8)
    .into()
}
