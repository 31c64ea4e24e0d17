//! Full-size modal viewer.
//!
//! Stacked over the gallery with a dimmed backdrop; clicking anywhere
//! closes it, matching the click-outside-to-close behavior of the grid's
//! expand action.

use iced::widget::{center, container, image, mouse_area, opaque};
use iced::{Color, Element, Length};

use crate::Message;

/// Build the dimmed overlay showing `handle` at full size.
pub fn overlay<'a>(handle: image::Handle) -> Element<'a, Message> {
    let backdrop = container(center(image(handle)))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.85).into()),
            ..container::Style::default()
        });

    opaque(mouse_area(backdrop).on_press(Message::CloseViewer))
}
