use chrono::NaiveDate;

/// Conversation steps, in the only order they can advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Start,
    Name,
    Phone,
    Purpose,
    Date,
    Time,
    Confirm,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    Bot,
    User,
}

/// Interactive element attached to a bot message. The transcript stores the
/// marker; the renderer supplies the actual control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Calendar,
    TimeSlots,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    pub widget: Option<Widget>,
}

impl ChatMessage {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            author: Author::Bot,
            text: text.into(),
            widget: None,
        }
    }

    pub fn bot_with(text: impl Into<String>, widget: Widget) -> Self {
        Self {
            author: Author::Bot,
            text: text.into(),
            widget: Some(widget),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
            widget: None,
        }
    }
}

/// The fixed offer of bookable slots. Mornings, a lunch slot, afternoons;
/// 01:00 PM is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSlot {
    NineAm,
    TenAm,
    ElevenAm,
    TwelvePm,
    TwoPm,
    ThreePm,
    FourPm,
    FivePm,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 8] = [
        TimeSlot::NineAm,
        TimeSlot::TenAm,
        TimeSlot::ElevenAm,
        TimeSlot::TwelvePm,
        TimeSlot::TwoPm,
        TimeSlot::ThreePm,
        TimeSlot::FourPm,
        TimeSlot::FivePm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::NineAm => "09:00 AM",
            TimeSlot::TenAm => "10:00 AM",
            TimeSlot::ElevenAm => "11:00 AM",
            TimeSlot::TwelvePm => "12:00 PM",
            TimeSlot::TwoPm => "02:00 PM",
            TimeSlot::ThreePm => "03:00 PM",
            TimeSlot::FourPm => "04:00 PM",
            TimeSlot::FivePm => "05:00 PM",
        }
    }
}

/// Answers collected so far. Filled field by field as steps complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub purpose: String,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
}
