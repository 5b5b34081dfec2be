use super::{ComfortLabel, ComfortResult};

/// Fill color and caption of a room on the floor map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ColorLabel {
    pub color: &'static str,
    pub note: &'static str,
}

/// Keyed on the label rather than on the numeric index, so a room whose
/// markers cancel out to exactly 0 is shown as ideal and only rooms without
/// markers are greyed out.
pub fn color_label_for(comfort: &ComfortResult) -> ColorLabel {
    let color = match comfort.label {
        ComfortLabel::NoData => "#e5e7eb",
        ComfortLabel::TooHot => "#ef4444",
        ComfortLabel::Warm => "#fca5a5",
        ComfortLabel::Ideal => "#34d399",
        ComfortLabel::Cool => "#a5b4fc",
        ComfortLabel::TooCold => "#3b82f6",
    };

    ColorLabel {
        color,
        note: comfort.label.display_name(),
    }
}
