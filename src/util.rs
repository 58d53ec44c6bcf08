use eframe::egui::Color32;

pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

pub fn format_money(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${grouped}")
}

pub fn initial_letter(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex_colors() {
        assert_eq!(
            parse_hex_color("#204090"),
            Some(Color32::from_rgb(32, 64, 144))
        );
        assert_eq!(
            parse_hex_color("#ffffff"),
            Some(Color32::from_rgb(255, 255, 255))
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        assert_eq!(parse_hex_color("204090"), None);
        assert_eq!(parse_hex_color("#20409"), None);
        assert_eq!(parse_hex_color("#20409g"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn formats_money_with_grouping() {
        assert_eq!(format_money(0), "$0");
        assert_eq!(format_money(500), "$500");
        assert_eq!(format_money(1800), "$1,800");
        assert_eq!(format_money(2_450_000), "$2,450,000");
    }

    #[test]
    fn initial_letter_uppercases() {
        assert_eq!(initial_letter("alice"), "A");
        assert_eq!(initial_letter("Bob"), "B");
        assert_eq!(initial_letter(""), "?");
    }
}
