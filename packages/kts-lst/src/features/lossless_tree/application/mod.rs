mod printer;

pub use printer::{print, print_to};
