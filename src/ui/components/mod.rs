pub mod keyboard_diagram;
pub mod letter_slots;
pub mod menu;
pub mod progress_bar;
pub mod results;
pub mod word_choices;
