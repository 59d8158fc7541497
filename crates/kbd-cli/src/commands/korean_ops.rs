use kbd_core::lang::{Converter, Korean};

pub fn korean_convert(text: &str) {
    println!("{}", Korean::new().convert(text));
}

pub fn korean_reverse(text: &str) {
    println!("{}", Korean::new().reverse(text));
}
