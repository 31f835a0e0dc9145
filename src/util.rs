// Small helpers shared by components and drivers

/// Hearts for remaining lives followed by black hearts for misses.
pub fn lives_display(max_misses: u32, missed: u32) -> String {
    let missed = missed.min(max_misses);
    let mut out = "❤️".repeat((max_misses - missed) as usize);
    out.push_str(&"🖤".repeat(missed as usize));
    out
}

/// `0x1234...abcd` form used for addresses and transaction hashes.
pub fn shorten_hex(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 10 {
        return s.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(target_arch = "wasm32")]
pub fn clog(msg: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
}

#[cfg(target_arch = "wasm32")]
pub fn cwarn(msg: &str) {
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(msg));
}

#[cfg(target_arch = "wasm32")]
pub fn cerr(msg: &str) {
    web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(msg));
}

// Console bindings only exist in the browser; native builds (tests) stay quiet.
#[cfg(not(target_arch = "wasm32"))]
pub fn clog(msg: &str) {
    let _ = msg;
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cwarn(msg: &str) {
    let _ = msg;
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cerr(msg: &str) {
    let _ = msg;
}
