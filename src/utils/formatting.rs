/// Shorten an account id for log lines: `GABC...WXYZ`.
pub fn format_address(address: &str) -> String {
    if address.len() > 10 && address.is_ascii() {
        format!("{}...{}", &address[..4], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

/// Short label for a network passphrase, e.g. `Test SDF Network`.
pub fn format_passphrase(passphrase: &str) -> &str {
    passphrase
        .split(';')
        .next()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(passphrase)
}
