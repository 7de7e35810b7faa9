//! Bot copy that is not tied to a single question.

/// Opening message once the participant has given their name.
pub fn greeting(name: &str) -> String {
    format!(
        "Hi {name}! 🌸\nWelcome\n\
         Let's go through a few short questions together so I know how you've been lately 💬"
    )
}

/// Closing message shown right before submission.
pub fn farewell(name: &str) -> String {
    format!(
        "🌷 End of our chat:\n\
         Thank you for taking the time to answer, {name} 💛\n\
         You can come back any time and share how you're doing 💬\n\
         Don't forget: even one small step for your wellbeing matters 🌿"
    )
}

pub const MEDICATION_REMINDER: &str =
    "💬 Maybe set an alarm on your phone so you don't forget to take your medication on time ⏰";

pub const ADHERENCE_REMINDER: &str = "💬 Thanks for telling me 💊 \
     Maybe set an alarm on your phone so you don't forget to take your medication on time ⏰";

/// Reply to asking for a talk when first saying you are not well.
pub fn contact_info(number: &str) -> String {
    format!("💬 Very good 🌼\nYou can call the center at {number} so we can arrange a talk.")
}

/// Bare contact line, used after the days-in-review follow-up.
pub fn contact_line(number: &str) -> String {
    format!("💬 You can call the center at {number} so we can arrange a talk.")
}

pub const SUGGESTIONS_INTRO: &str = "Would you like me to suggest a small step? 🌱\n\
     Sometimes a simple thing can make your heart and body feel better.\n\
     Pick one of these and try it today 💚";

pub const SUGGESTIONS_TITLE: &str = "Small suggestions for feeling good:";

/// Fixed list of small steps offered after `want_to` / `no`.
pub const SUGGESTIONS: &[&str] = &[
    "🎵 Listen to a song you love",
    "💃 Dance for two minutes right where you are",
    "🤸 Do a gentle stretch with your hands or neck",
    "💌 Send a close friend a short message and ask how they are",
    "📖 Find a poem or a beautiful sentence online and read it",
    "🎨 Colour a page of an adult colouring book (or draw something simple)",
    "🎤 Sing a little, even if it's only for yourself",
    "🎧 Listen to a calming or uplifting podcast",
    "💇 Brush your hair or try a new style",
    "🧺 Tidy one corner of your room",
    "😊 Smile at someone around you",
    "🌿 Water your plants",
    "🕊️ Feed the birds",
    "📱 Delete a few extra photos or files from your phone",
    "☀️ Stand by the window for a few minutes and breathe deeply",
];

pub const SUGGESTIONS_OUTRO: &str = "💬 Great 💚 One small thing can be the start of feeling good.\n\
     Come back later and tell me whether you did it 😄";

/// Shown when the endpoint refused the submission without saying why.
pub const SUBMISSION_REJECTED: &str = "Your responses could not be accepted.";

pub const SUBMISSION_FAILED: &str =
    "⚠️ Something went wrong while saving your responses. Please try again.";

pub const NAME_PROMPT: &str = "What's your name?";

pub const RETRY_PROMPT: &str = "Try sending your responses again? (y/n)";

/// Prefix for messages relayed from the endpoint.
pub fn server_notice(message: &str) -> String {
    format!("⚠️ {message}")
}
