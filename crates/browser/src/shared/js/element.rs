/// Visibility and hit-test state of the first match. Every flag is a boolean.
pub const CHECK_ELEMENT_STATE: &str = r#"
(selector) => {
    const el = document.querySelector(selector);
    if (!el) return { exists: false };

    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    const visible = rect.width > 0 && rect.height > 0 &&
        style.visibility !== 'hidden' && style.display !== 'none';
    if (!visible) return { exists: true, visible: false };

    const hit = document.elementFromPoint(rect.left + rect.width / 2, rect.top + rect.height / 2);
    return {
        exists: true,
        visible: true,
        obscured: !!hit && hit !== el && !el.contains(hit),
        disabled: !!el.disabled || el.getAttribute('aria-disabled') === 'true'
    };
}
"#;

pub const SCROLL_INTO_VIEW: &str = r#"
(selector, block) => {
    const el = document.querySelector(selector);
    if (!el) return { success: false, error: 'Element not found' };
    el.scrollIntoView({ behavior: 'instant', block: block || 'center' });
    return { success: true };
}
"#;

pub const SAFE_CLICK: &str = r#"
(selector) => {
    const el = document.querySelector(selector);
    if (!el) return { success: false, error: 'Element not found' };
    el.click();
    return { success: true };
}
"#;

/// Rendered text of the first match, or null when nothing matches.
pub const INNER_TEXT: &str = r#"
(selector) => {
    const el = document.querySelector(selector);
    return el ? el.innerText : null;
}
"#;
