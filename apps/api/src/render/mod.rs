pub mod pdf;

pub use pdf::render_profile_pdf;
