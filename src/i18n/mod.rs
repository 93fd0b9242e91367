//! Internationalization module
//!
//! Message catalogs for the two supported locales. Each locale maps to a
//! struct of named templates, so a missing key is a compile error rather
//! than a runtime lookup failure. Placeholders use `{name}`, `{count}`,
//! `{user_id}` and `{link}` with plain positional substitution.

use crate::models::Locale;

/// Message templates for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub welcome: &'static str,
    pub referral: &'static str,
    pub link: &'static str,
    pub language_button: &'static str,
    pub language_changed: &'static str,
    pub join_prompt: &'static str,
    pub join_button: &'static str,
    pub check_button: &'static str,
    pub still_not_subscribed: &'static str,
}

const AR: Messages = Messages {
    welcome: "🎉 مرحبًا {name} 👋\n\nأهلاً بك، استمتع بمزايا البوت! ✅",
    referral: "👥 عدد الأشخاص الذين قمت بإحالتهم: {count} 🔥",
    link: "📌 شارك الرابط التالي مع أصدقائك:\n{link}",
    language_button: "تغيير اللغة",
    language_changed: "تم تغيير اللغة إلى العربية.",
    join_prompt: "⚠️ يجب الاشتراك في القناة لتفعيل البوت",
    join_button: "اضغط هنا للإنضمام 📌",
    check_button: "تحقّق من الإشتراك",
    still_not_subscribed: "⚠️ ما زلت غير مشترك بالقناة!",
};

const EN: Messages = Messages {
    welcome: "🎉 Welcome {name} 👋\n\nEnjoy the bot features!",
    referral: "👥 Number of people you referred: {count}",
    link: "📌 Share this link with your friends:\n{link}",
    language_button: "Change language",
    language_changed: "Language changed to English.",
    join_prompt: "⚠️ You must join the channel to activate the bot.",
    join_button: "Tap here to join 📌",
    check_button: "Check subscription",
    still_not_subscribed: "⚠️ You are still not subscribed to the channel!",
};

/// The catalog for a locale.
pub fn messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::Ar => &AR,
        Locale::En => &EN,
    }
}

/// Substitute `{key}` placeholders in a template.
pub fn format(template: &str, params: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in params {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Build the shareable deep link embedding the inviter's id.
pub fn share_link(bot_username: &str, user_id: i64) -> String {
    format!("https://t.me/{bot_username}?start={user_id}")
}
