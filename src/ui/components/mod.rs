pub mod two_column_section;
pub mod value_slider;
