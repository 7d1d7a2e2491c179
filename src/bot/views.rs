//! User-facing texts, keyboards and callback tokens.

use crate::relay::UserId;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// ─────────────────────────────────────────────────────────────────────────────
// Callback constants
// ─────────────────────────────────────────────────────────────────────────────

/// Callback data for the "explain further" button
pub const FOLLOWUP_CALLBACK: &str = "explain";
/// Prefix of every administrator callback; never handled as a follow-up
pub const ADMIN_CALLBACK_PREFIX: &str = "admin_";
/// Callback data for turning the bot on
pub const ADMIN_CALLBACK_ENABLE: &str = "admin_enable";
/// Callback data for turning the bot off
pub const ADMIN_CALLBACK_DISABLE: &str = "admin_disable";

/// Whether callback `data` belongs to the administrator namespace
#[must_use]
pub fn is_admin_callback(data: &str) -> bool {
    data.starts_with(ADMIN_CALLBACK_PREFIX)
}

/// Builds the follow-up callback token for a reply to `owner_id`
#[must_use]
pub fn followup_token(owner_id: UserId) -> String {
    format!("{FOLLOWUP_CALLBACK}:{owner_id}")
}

/// Resolves the owner of a follow-up token.
///
/// A bare `explain` token refers to the acting user. Returns `None` for
/// tokens that are not follow-ups, including the admin namespace.
///
/// # Examples
///
/// ```
/// use relay_translator::bot::views::parse_followup_token;
///
/// assert_eq!(parse_followup_token("explain:42", 7), Some(42));
/// assert_eq!(parse_followup_token("explain", 7), Some(7));
/// assert_eq!(parse_followup_token("admin_enable", 7), None);
/// ```
#[must_use]
pub fn parse_followup_token(data: &str, acting_user_id: UserId) -> Option<UserId> {
    if is_admin_callback(data) {
        return None;
    }
    match data.split_once(':') {
        Some((FOLLOWUP_CALLBACK, owner)) => owner.parse().ok(),
        None if data == FOLLOWUP_CALLBACK => Some(acting_user_id),
        _ => None,
    }
}

/// Inline keyboard attached to every translation
#[must_use]
pub fn followup_keyboard(owner_id: UserId) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "📝 ရှင်းလင်းချက် ထပ်ကြည့်မယ်",
        followup_token(owner_id),
    )]])
}

/// Inline keyboard of the admin panel
#[must_use]
pub fn admin_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Bot ဖွင့်မယ်", ADMIN_CALLBACK_ENABLE),
        InlineKeyboardButton::callback("⛔️ Bot ပိတ်မယ်", ADMIN_CALLBACK_DISABLE),
    ]])
}

// ─────────────────────────────────────────────────────────────────────────────
// Texts
// ─────────────────────────────────────────────────────────────────────────────

/// Greeting for `/start`
pub const WELCOME: &str = "🙏 <b>မင်္ဂလာပါ! (Sawadee Krub/Ka)</b>\n\n\
ကျွန်တော်က ထိုင်း-မြန်မာ အပြန်အလှန် ဘာသာပြန် Bot ပါ။\n\
အခမဲ့ AI နည်းပညာကို သုံးထားပါတယ်။\n\n\
👉 <b>အသုံးပြုနည်း:</b>\n\
1. ထိုင်း/မြန်မာ စာသား ရိုက်ပို့ပါ။\n\
2. 🎤 <b>အသံဖိုင် (Voice Msg)</b> ပို့ပြီးလည်း မေးနိုင်ပါသည်။\n\
3. Admin များသည် /admin ဖြင့် ထိန်းချုပ်နိုင်ပါသည်။\n\n\
---\n\
✨ <b>Developed by @MyanmarTecharea</b>";

/// Reply while the availability flag is off
pub const MAINTENANCE: &str = "⛔️ Bot ကို ပြုပြင်နေပါသည်။ ခဏစောင့်ပါ။";
/// Reply after every translation attempt failed
pub const TRANSIENT_FAILURE: &str =
    "⚠️ ယာယီချို့ယွင်းချက်ရှိနေပါသည်။ ခဏနောက် ထပ်ကြိုးစားကြည့်ပါ။";
/// Follow-up pressed by someone other than the original requester
pub const NOT_OWNER: &str = "သင့်ရဲ့ မေးခွန်းဟောင်းမဟုတ်ပါ။";
/// Follow-up without a stored query
pub const NO_PRIOR_QUERY: &str = "အရင်မေးခွန်း မတွေ့ပါ။";
/// Shown before the explanation call
pub const EXPLAINING: &str = "⏳ အသေးစိတ်ရှင်းပြနေပါသည်...";
/// Acknowledgement of a received voice message
pub const VOICE_RECEIVED: &str = "🎤 အသံကို ခွဲခြမ်းစိတ်ဖြာနေပါသည်...";
/// Voice translation is switched off
pub const VOICE_DISABLED: &str = "⚠️ အသံဘာသာပြန်ခြင်း ယာယီရပ်ထားပါသည်။ စာသားရိုက်ပို့ပါ။";
/// Message carried no voice payload
pub const VOICE_MISSING: &str = "အသံဖိုင်မတွေ့ပါ။";
/// Voice download failed
pub const VOICE_ERROR: &str = "အသံဖိုင်ကိုင်တွယ်ရာတွင် ပြဿနာရှိနေပါသည်။";
/// Non-admin tried an admin action
pub const ACCESS_DENIED: &str = "⛔️ Access denied";

/// HTML header placed above every explanation
pub const EXPLANATION_HEADER: &str = "📖 <b>ရှင်းလင်းချက်:</b>\n\n";

/// Admin panel text for the current availability flag
#[must_use]
pub fn admin_panel(active: bool) -> String {
    let status = if active {
        "✅ ဖွင့်ထားသည် (Active)"
    } else {
        "⛔️ ပိတ်ထားသည် (Maintenance)"
    };
    format!("🛠 <b>Admin Panel</b>\n\nStatus: {status}")
}
