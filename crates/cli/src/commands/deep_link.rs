//! WhatsApp link command.

use portfolio_core::WhatsAppLink;

/// Build the click-to-chat link for `phone`.
///
/// Without both a name and a message the floating button's greeting is
/// used.
#[must_use]
pub fn link(phone: &str, name: Option<&str>, message: Option<&str>) -> WhatsAppLink {
    match (name, message) {
        (Some(name), Some(message)) => WhatsAppLink::for_message(phone, name.trim(), message.trim()),
        _ => WhatsAppLink::greeting(phone),
    }
}

/// Print the link.
#[allow(clippy::print_stdout)]
pub fn run(phone: &str, name: Option<&str>, message: Option<&str>) {
    println!("{}", link(phone, name, message));
}
