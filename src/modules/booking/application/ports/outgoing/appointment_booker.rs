use async_trait::async_trait;

use crate::modules::content::domain::entities::NewAppointment;

/// Outgoing port the conversation uses to submit a finished booking.
///
/// The boolean mirrors what the conversation can act on: `true` advances to
/// the success message, `false` to the retry message. Transport detail stays
/// behind the implementor.
#[async_trait]
pub trait AppointmentBooker: Send + Sync {
    async fn book(&self, appointment: NewAppointment) -> bool;
}
