pub mod appointment_booker;
