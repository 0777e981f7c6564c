//! Appointment booking conversation.
//!
//! A strictly ordered dialog: name, phone, purpose, date, time, confirmation.
//! Every exchange is appended to a transcript the UI replays verbatim.
//! Rejected input leaves the step unchanged; only the phone step echoes a
//! warning into the transcript, the rest reject silently.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::modules::booking::application::ports::outgoing::appointment_booker::AppointmentBooker;
use crate::modules::booking::domain::calendar;
use crate::modules::booking::domain::entities::{
    BookingForm, ChatMessage, Step, TimeSlot, Widget,
};
use crate::modules::content::domain::entities::NewAppointment;

const MSG_GREETING: &str =
    "👋 Hi! I can help you schedule an appointment. Click below to get started.";
const MSG_ASK_NAME: &str = "👤 What's your name?";
const MSG_ASK_PHONE: &str = "📱 Enter your phone number (with country code):";
const MSG_PHONE_WARNING: &str =
    "⚠️ Please enter a valid phone number with country code (e.g., +91 9876543210)";
const MSG_ASK_PURPOSE: &str = "📝 What's the purpose of this meeting?";
const MSG_ASK_DATE: &str = "📅 Select a date:";
const MSG_ASK_TIME: &str = "⏰ Pick a time slot:";
const MSG_REVIEW: &str = "📋 Review your booking:";
const MSG_SAVING: &str = "⏳ Saving...";
const MSG_SUCCESS: &str = "✅ Appointment booked! You'll receive a confirmation soon.";
const MSG_FAILURE: &str = "❌ Failed to save. Please try again.";

const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingInputError {
    #[error("input is empty")]
    EmptyInput,

    #[error("phone number needs at least {MIN_PHONE_DIGITS} digits")]
    PhoneTooShort,

    #[error("date is in the past or on a Sunday")]
    DateNotSelectable,

    #[error("that input does not belong to the current step")]
    OutOfTurn,
}

pub struct BookingConversation {
    step: Step,
    form: BookingForm,
    transcript: Vec<ChatMessage>,
    today: NaiveDate,
    is_open: bool,
}

impl BookingConversation {
    /// A closed conversation waiting for the visitor to start it.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: Step::Start,
            form: BookingForm::default(),
            transcript: vec![ChatMessage::bot(MSG_GREETING)],
            today,
            is_open: false,
        }
    }

    /// Opened directly from a service card: the purpose is already known, so
    /// the dialog acknowledges it and jumps straight to the name step.
    pub fn with_purpose(today: NaiveDate, purpose: &str) -> Self {
        let mut conversation = Self::new(today);
        conversation.is_open = true;
        conversation.form.purpose = purpose.to_string();
        conversation.transcript = vec![
            ChatMessage::bot(format!(
                "Great! You want to book: \"{purpose}\". Let's get started!"
            )),
            ChatMessage::bot(MSG_ASK_NAME),
        ];
        conversation.step = Step::Name;
        conversation
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Back to a pristine greeting; the transcript and form are discarded.
    pub fn reset(&mut self) {
        self.step = Step::Start;
        self.form = BookingForm::default();
        self.transcript = vec![ChatMessage::bot(MSG_GREETING)];
    }

    /// The visitor clicked "get started".
    pub fn begin(&mut self) -> Result<(), BookingInputError> {
        if self.step != Step::Start {
            return Err(BookingInputError::OutOfTurn);
        }
        self.transcript.push(ChatMessage::bot(MSG_ASK_NAME));
        self.step = Step::Name;
        Ok(())
    }

    /// Free-text answer for the name, phone and purpose steps.
    pub fn submit_text(&mut self, input: &str) -> Result<(), BookingInputError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            // Nothing is echoed; the prompt simply stays.
            return Err(BookingInputError::EmptyInput);
        }

        match self.step {
            Step::Name => {
                self.transcript.push(ChatMessage::user(trimmed));
                self.form.name = trimmed.to_string();
                self.transcript.push(ChatMessage::bot(MSG_ASK_PHONE));
                self.step = Step::Phone;
                Ok(())
            }
            Step::Phone => {
                self.transcript.push(ChatMessage::user(trimmed));
                if digit_count(trimmed) < MIN_PHONE_DIGITS {
                    self.transcript.push(ChatMessage::bot(MSG_PHONE_WARNING));
                    return Err(BookingInputError::PhoneTooShort);
                }
                self.form.phone = trimmed.to_string();
                if self.form.purpose.is_empty() {
                    self.transcript.push(ChatMessage::bot(MSG_ASK_PURPOSE));
                    self.step = Step::Purpose;
                } else {
                    // The purpose came in with the conversation; skip straight
                    // to scheduling.
                    self.transcript
                        .push(ChatMessage::bot_with(MSG_ASK_DATE, Widget::Calendar));
                    self.step = Step::Date;
                }
                Ok(())
            }
            Step::Purpose => {
                self.transcript.push(ChatMessage::user(trimmed));
                self.form.purpose = trimmed.to_string();
                self.transcript
                    .push(ChatMessage::bot_with(MSG_ASK_DATE, Widget::Calendar));
                self.step = Step::Date;
                Ok(())
            }
            _ => Err(BookingInputError::OutOfTurn),
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingInputError> {
        if self.step != Step::Date {
            return Err(BookingInputError::OutOfTurn);
        }
        if !calendar::is_selectable(date, self.today) {
            return Err(BookingInputError::DateNotSelectable);
        }
        self.form.date = Some(date);
        self.transcript
            .push(ChatMessage::user(calendar::format_long(date)));
        self.transcript
            .push(ChatMessage::bot_with(MSG_ASK_TIME, Widget::TimeSlots));
        self.step = Step::Time;
        Ok(())
    }

    pub fn select_time(&mut self, slot: TimeSlot) -> Result<(), BookingInputError> {
        if self.step != Step::Time {
            return Err(BookingInputError::OutOfTurn);
        }
        self.form.time = Some(slot);
        self.transcript.push(ChatMessage::user(slot.label()));
        self.transcript
            .push(ChatMessage::bot_with(MSG_REVIEW, Widget::Summary));
        self.step = Step::Confirm;
        Ok(())
    }

    /// Submits the collected form. On failure the step stays at `Confirm` so
    /// the visitor can try again; the form is never lost.
    pub async fn confirm(
        &mut self,
        booker: &dyn AppointmentBooker,
    ) -> Result<bool, BookingInputError> {
        if self.step != Step::Confirm {
            return Err(BookingInputError::OutOfTurn);
        }
        let (Some(date), Some(time)) = (self.form.date, self.form.time) else {
            return Err(BookingInputError::OutOfTurn);
        };

        self.transcript.push(ChatMessage::bot(MSG_SAVING));

        let appointment = NewAppointment {
            name: self.form.name.clone(),
            phone: self.form.phone.clone(),
            purpose: self.form.purpose.clone(),
            date: calendar::format_long(date),
            time: time.label().to_string(),
        };

        let booked = booker.book(appointment).await;
        if booked {
            self.transcript.push(ChatMessage::bot(MSG_SUCCESS));
            self.step = Step::Success;
        } else {
            self.transcript.push(ChatMessage::bot(MSG_FAILURE));
        }
        Ok(booked)
    }
}

fn digit_count(input: &str) -> usize {
    static NON_DIGITS: OnceLock<Regex> = OnceLock::new();
    let pattern = NON_DIGITS.get_or_init(|| {
        Regex::new(r"\D").expect("static pattern")
    });
    pattern.replace_all(input, "").len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::booking::domain::entities::Author;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct FakeBooker {
        accept: AtomicBool,
        received: Mutex<Vec<NewAppointment>>,
    }

    impl FakeBooker {
        fn accepting() -> Self {
            Self {
                accept: AtomicBool::new(true),
                received: Mutex::new(Vec::new()),
            }
        }

        fn rejecting() -> Self {
            let booker = Self::accepting();
            booker.accept.store(false, Ordering::SeqCst);
            booker
        }
    }

    #[async_trait::async_trait]
    impl AppointmentBooker for FakeBooker {
        async fn book(&self, appointment: NewAppointment) -> bool {
            self.received.lock().unwrap().push(appointment);
            self.accept.load(Ordering::SeqCst)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
    }

    fn filled_to_confirm() -> BookingConversation {
        let mut c = BookingConversation::new(today());
        c.begin().unwrap();
        c.submit_text("Jane Doe").unwrap();
        c.submit_text("+91 9876543210").unwrap();
        c.submit_text("Website Audit").unwrap();
        c.select_date(NaiveDate::from_ymd_opt(2026, 9, 8).unwrap())
            .unwrap();
        c.select_time(TimeSlot::TenAm).unwrap();
        c
    }

    #[test]
    fn test_starts_closed_with_greeting() {
        let c = BookingConversation::new(today());
        assert!(!c.is_open());
        assert_eq!(c.step(), Step::Start);
        assert_eq!(c.transcript().len(), 1);
        assert!(c.transcript()[0].text.contains("schedule an appointment"));
    }

    #[test]
    fn test_with_purpose_skips_to_name() {
        let c = BookingConversation::with_purpose(today(), "Website Audit");
        assert!(c.is_open());
        assert_eq!(c.step(), Step::Name);
        assert_eq!(c.form().purpose, "Website Audit");
        assert_eq!(
            c.transcript()[0].text,
            "Great! You want to book: \"Website Audit\". Let's get started!"
        );
    }

    #[test]
    fn test_empty_input_leaves_transcript_untouched() {
        let mut c = BookingConversation::new(today());
        c.begin().unwrap();
        let before = c.transcript().len();

        assert_eq!(c.submit_text("   "), Err(BookingInputError::EmptyInput));
        assert_eq!(c.transcript().len(), before);
        assert_eq!(c.step(), Step::Name);
    }

    #[test]
    fn test_short_phone_warns_and_stays() {
        let mut c = BookingConversation::new(today());
        c.begin().unwrap();
        c.submit_text("Jane").unwrap();

        assert_eq!(
            c.submit_text("12345"),
            Err(BookingInputError::PhoneTooShort)
        );
        assert_eq!(c.step(), Step::Phone);
        let last = c.transcript().last().unwrap();
        assert_eq!(last.author, Author::Bot);
        assert!(last.text.starts_with('⚠'));

        // Formatting characters do not count toward the digit minimum.
        assert_eq!(
            c.submit_text("+++--(123) 456"),
            Err(BookingInputError::PhoneTooShort)
        );

        // A formatted number with enough digits passes.
        c.submit_text("+91 98765-43210").unwrap();
        assert_eq!(c.step(), Step::Purpose);
        assert_eq!(c.form().phone, "+91 98765-43210");
    }

    #[test]
    fn test_known_purpose_skips_the_purpose_question() {
        let mut c = BookingConversation::with_purpose(today(), "Website Audit");
        c.submit_text("Jane Doe").unwrap();
        c.submit_text("+91 9876543210").unwrap();

        assert_eq!(c.step(), Step::Date);
        assert_eq!(c.form().purpose, "Website Audit");
        assert_eq!(
            c.transcript().last().unwrap().widget,
            Some(Widget::Calendar)
        );
    }

    #[test]
    fn test_sunday_and_past_dates_rejected() {
        let mut c = BookingConversation::new(today());
        c.begin().unwrap();
        c.submit_text("Jane").unwrap();
        c.submit_text("+91 9876543210").unwrap();
        c.submit_text("Audit").unwrap();

        let sunday = NaiveDate::from_ymd_opt(2026, 9, 13).unwrap();
        assert_eq!(
            c.select_date(sunday),
            Err(BookingInputError::DateNotSelectable)
        );
        let yesterday = NaiveDate::from_ymd_opt(2026, 9, 6).unwrap();
        assert_eq!(
            c.select_date(yesterday),
            Err(BookingInputError::DateNotSelectable)
        );
        assert_eq!(c.step(), Step::Date);
    }

    #[test]
    fn test_widgets_attach_to_the_right_prompts() {
        let c = filled_to_confirm();
        let widgets: Vec<_> = c
            .transcript()
            .iter()
            .filter_map(|m| m.widget)
            .collect();
        assert_eq!(
            widgets,
            vec![Widget::Calendar, Widget::TimeSlots, Widget::Summary]
        );
    }

    #[tokio::test]
    async fn test_confirm_success_reaches_terminal_step() {
        let mut c = filled_to_confirm();
        let booker = FakeBooker::accepting();

        let booked = c.confirm(&booker).await.unwrap();

        assert!(booked);
        assert_eq!(c.step(), Step::Success);
        assert!(c.transcript().last().unwrap().text.starts_with('✅'));

        let received = booker.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "Jane Doe");
        assert_eq!(received[0].date, "Tue, Sep 8, 2026");
        assert_eq!(received[0].time, "10:00 AM");
    }

    #[tokio::test]
    async fn test_confirm_failure_allows_retry_with_same_form() {
        let mut c = filled_to_confirm();
        let booker = FakeBooker::rejecting();

        let booked = c.confirm(&booker).await.unwrap();

        assert!(!booked);
        assert_eq!(c.step(), Step::Confirm);
        assert!(c.transcript().last().unwrap().text.starts_with('❌'));
        assert_eq!(c.form().name, "Jane Doe");

        // Retrying works without re-entering anything.
        let retry = FakeBooker::accepting();
        assert!(c.confirm(&retry).await.unwrap());
        assert_eq!(c.step(), Step::Success);
    }

    #[test]
    fn test_out_of_turn_inputs_rejected() {
        let mut c = BookingConversation::new(today());
        assert_eq!(
            c.select_time(TimeSlot::TenAm),
            Err(BookingInputError::OutOfTurn)
        );
        assert_eq!(
            c.select_date(today()),
            Err(BookingInputError::OutOfTurn)
        );
        c.begin().unwrap();
        assert_eq!(c.begin(), Err(BookingInputError::OutOfTurn));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut c = filled_to_confirm();
        c.reset();
        assert_eq!(c.step(), Step::Start);
        assert_eq!(c.form(), &BookingForm::default());
        assert_eq!(c.transcript().len(), 1);
    }
}
