use minijinja::{Environment, context};

use super::persona::BotPersonality;
use crate::error::Result;
use crate::language::Language;

pub const DEFAULT_BOT_NAME: &str = "Luna";

const PERSONA_TEMPLATE: &str = "You are {{ name }}, a tarot bot with a {{ style }} style. Always reply in that tone.\
{% if lang == 'zh' %} Always reply in Chinese.{% endif %}";

const DEFAULT_TEMPLATE_EN: &str = "You are {{ name }}, a mystical tarot reader with a poetic and magical style. \
Keep your answers short and romantic like a fortune teller.";

const DEFAULT_TEMPLATE_ZH: &str = "你是{{ name }}，一位充满爱意和浪漫风格的塔罗牌占卜师。请始终用中文回复。";

/// Renders the system prompt sent with every bot question.
///
/// A configured personality wins; otherwise the default reader speaks the
/// language of the question.
pub fn system_prompt(personality: Option<&BotPersonality>, lang: Language) -> Result<String> {
    let env = Environment::new();
    let rendered = match personality {
        Some(p) => env.render_str(
            PERSONA_TEMPLATE,
            context! { name => p.name, style => p.style, lang => lang.to_string() },
        )?,
        None => {
            let template = match lang {
                Language::En => DEFAULT_TEMPLATE_EN,
                Language::Zh => DEFAULT_TEMPLATE_ZH,
            };
            env.render_str(template, context! { name => DEFAULT_BOT_NAME })?
        }
    };
    Ok(rendered)
}
