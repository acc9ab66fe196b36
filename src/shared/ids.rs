use std::time::{SystemTime, UNIX_EPOCH};

/// Appends `value` in lowercase base 36, left-padded with zeros to `width`.
fn push_radix36(out: &mut String, mut value: u64, width: usize) {
    let mut digits = Vec::with_capacity(width.max(13));
    loop {
        digits.push(std::char::from_digit((value % 36) as u32, 36).unwrap_or('0'));
        value /= 36;
        if value == 0 && digits.len() >= width {
            break;
        }
    }
    out.extend(digits.iter().rev());
}

/// Compact, roughly time-ordered id used to correlate the log lines of one
/// workflow run, e.g. `run-sl9x1c-0k3z`. The suffix is four random base-36
/// digits, taken from the clock when the OS has no entropy to give.
pub fn generate_run_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let mut entropy = [0_u8; 4];
    let noise = match getrandom::getrandom(&mut entropy) {
        Ok(()) => u32::from_le_bytes(entropy),
        Err(_) => now.subsec_nanos(),
    };

    let mut id = String::from("run-");
    push_radix36(&mut id, now.as_secs(), 1);
    id.push('-');
    push_radix36(&mut id, u64::from(noise) % 36_u64.pow(4), 4);
    id
}
