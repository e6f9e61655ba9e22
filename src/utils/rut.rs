use once_cell::sync::Lazy;
use regex::Regex;

static RUT_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}\.\d{3}\.\d{3}-[\dkK]$").expect("static RUT pattern")
});

/// True for the dotted `XX.XXX.XXX-X` form.
pub fn is_valid_format(rut: &str) -> bool {
    RUT_FORMAT.is_match(rut)
}

/// Formats a raw RUT (`123456785`, `12345678-5`) as `12.345.678-5`.
pub fn format(rut: &str) -> String {
    let mut digits: Vec<char> = rut.chars().filter(|c| *c != '.' && *c != '-').collect();
    if digits.len() < 2 {
        return digits.into_iter().collect();
    }

    let dv = digits.pop().unwrap_or_default();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    format!("{grouped}-{dv}")
}
