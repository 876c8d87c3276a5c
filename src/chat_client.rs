use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::configuration::ChatSettings;
use crate::routes::chat::schemas::ChatTurn;

/// Returned to the shopper whenever the provider fails; the widget keeps
/// working and hands the conversation to a human channel.
pub const CHAT_DEGRADED_REPLY: &str = "I'm having trouble right now. Please reach out to us on WhatsApp at +1 (786) 709-1027 for immediate help!";

const EMPTY_COMPLETION_REPLY: &str = "I'm sorry, I couldn't process that. Please try again or reach out to us on WhatsApp at +1 (786) 709-1027.";

const SYSTEM_PROMPT: &str = r#"You are a friendly, helpful customer service assistant for Jamaica House Brand, an authentic Jamaican sauce company with 30+ years of restaurant heritage. You speak warmly and casually but professionally. Keep responses concise (2-4 sentences when possible).

## PRODUCTS & PRICING
- Original Jerk Sauce (2oz) - $6.99 | Authentic family recipe with allspice, thyme, Scotch bonnet peppers. Zero calories, all natural.
- Original Jerk Sauce (5oz) - $11.99 | Same recipe, larger size. Great for regular use.
- Original Jerk Sauce (10oz) - $18.99 | Bulk size, perfect for families and meal prep.
- Escovitch Pikliz (12oz) - $11.99 | Spicy Jamaican pickled vegetable relish with habanero peppers, carrots, onions, vinegar. Perfect with jerk chicken and grilled meats.
- Jamaica House Bundle - $24.99 (Save $6!) | Includes 2oz + 5oz Jerk Sauce + 12oz Pikliz. Original value $30.97.

All products are: all natural, zero calories, handcrafted, based on our 30-year family recipe.

## SHIPPING
- Standard Shipping: $5.99 (5-7 business days)
- Express Shipping: $12.99 (2-3 business days)
- FREE Shipping on orders over $50
- Ships within the US only

## CATERING SERVICES
We cater events of all sizes with authentic Jamaican food.

Proteins: Jerk Chicken, Curry Goat, Oxtail, Brown Stew Chicken, Escovitch Fish, Curry Chicken
Sides: Rice & Peas, Fried Plantains, Festival, Steamed Cabbage, Mac & Cheese, Coleslaw
Beverages: Sorrel Punch, Jamaican Fruit Punch, Ginger Beer, Lemonade, Bottled Water, Iced Tea

Pricing per person:
- 20-50 guests: $25/person (2 proteins, 3 sides, 1 beverage)
- 51-100 guests: $22/person (2 proteins, 3 sides, 2 beverages)
- 101-200 guests: $20/person (3 proteins, 4 sides, 2 beverages)
- 201-500 guests: $18/person (3 proteins, 4 sides, 2 beverages)
- 500+ guests: $15/person (custom menu)

Event types: Wedding, Corporate Event, Birthday Party, Family Reunion, Church Event, Holiday Party, Graduation

## MEMBERSHIP / FAMILY PLAN
- Standard Annual: $75/year - 13 bottles (5oz) delivered quarterly, $5.77/bottle, FREE shipping, 15% off first year, bonus gift bottle
- Premium Annual: $125/year - 13 bottles (10oz) delivered quarterly, $9.62/bottle, FREE shipping, 15% off first year, bonus gift bottle, exclusive recipes, VIP event invitations

## RESTAURANT LOCATIONS
- Jamaica House Miami: 19555 NW 2nd Ave, Miami, FL 33169 | (305) 651-0083
- Jamaica House Broward: 3351 W Broward Blvd, Fort Lauderdale, FL 33312 | (954) 530-2698
- Jamaica House Miramar: Coming Soon!

## RECIPES (on our website)
We have recipes on our site: Authentic Jerk Chicken, Jerk Shrimp Tacos, Jerk Salmon with Rice & Peas, Escovitch Fish, Jerk Chicken Wings, Pikliz Burger. Visit jamaicahousebrand.com/recipes for full details.

## OUR STORY
Chef Anthony grew up in New York with Jamaican parents. His father ran Jamaica House restaurants in South Florida for 30+ years. 92% of restaurant customers asked "Can I buy a bottle of that sauce?" - so Jamaica House Brand was born to bring the authentic restaurant experience to home kitchens.

## INSTRUCTIONS
- Answer questions using ONLY the information above. Do not make up information.
- If asked about something not covered above, say you're not sure and suggest they reach out on WhatsApp at +1 (786) 709-1027 for personalized help.
- For catering orders and custom requests, always recommend they contact us on WhatsApp at +1 (786) 709-1027.
- Suggest relevant products when appropriate (e.g., if someone asks about a recipe, mention the sauce used).
- If someone wants to speak to a person or needs help beyond what you can provide, direct them to WhatsApp: +1 (786) 709-1027.
- Be enthusiastic about the brand and products without being pushy.
- Use the website URL jamaicahousebrand.com when referencing pages (e.g., /shop, /recipes, /catering-services, /family-members)."#;

#[async_trait]
pub trait GenericChatService: Send + Sync {
    async fn generate_reply(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, anyhow::Error>;
}

struct ScriptedRule {
    keywords: &'static [&'static str],
    reply: &'static str,
}

/// First matching rule wins, so broad product keywords sit below the more
/// specific catering and membership rules.
static SCRIPTED_RULES: &[ScriptedRule] = &[
    ScriptedRule {
        keywords: &["ship", "delivery", "deliver"],
        reply: "Standard shipping is $5.99 (5-7 business days) and express is $12.99 (2-3 business days). Orders over $50 ship FREE! We currently ship within the US only.",
    },
    ScriptedRule {
        keywords: &["cater", "event", "wedding", "party", "guests"],
        reply: "We cater events of all sizes with authentic Jamaican food, from jerk chicken to curry goat and oxtail. Pricing runs $15-$25 per person depending on guest count. Reach out on WhatsApp at +1 (786) 709-1027 and we'll put together a custom quote!",
    },
    ScriptedRule {
        keywords: &["member", "subscription", "family plan"],
        reply: "Our Family Plan delivers 13 bottles a year, quarterly, with FREE shipping. Standard is $75/year (5oz bottles) and Premium is $125/year (10oz bottles plus exclusive recipes and VIP invites). Check out jamaicahousebrand.com/family-members to join!",
    },
    ScriptedRule {
        keywords: &["bundle"],
        reply: "The Jamaica House Bundle is $24.99 and saves you $6. You get a 2oz and a 5oz Original Jerk Sauce plus a 12oz Escovitch Pikliz. It's the best way to try everything we make!",
    },
    ScriptedRule {
        keywords: &["pikliz", "escovitch"],
        reply: "Escovitch Pikliz (12oz) is $11.99. It's our spicy Jamaican pickled vegetable relish with habanero peppers, carrots, onions, and vinegar. Perfect with jerk chicken and grilled meats!",
    },
    ScriptedRule {
        keywords: &["sauce", "jerk", "price", "product", "buy"],
        reply: "Our Original Jerk Sauce comes in 2oz ($6.99), 5oz ($11.99), and 10oz ($18.99), and Escovitch Pikliz is $11.99. Everything is all natural, zero calories, and handcrafted from our 30-year family recipe. Browse it all at jamaicahousebrand.com/shop!",
    },
    ScriptedRule {
        keywords: &[
            "location",
            "restaurant",
            "address",
            "miami",
            "broward",
            "fort lauderdale",
            "miramar",
        ],
        reply: "You can visit Jamaica House Miami at 19555 NW 2nd Ave, Miami, FL 33169 or Jamaica House Broward at 3351 W Broward Blvd, Fort Lauderdale, FL 33312. Jamaica House Miramar is coming soon!",
    },
    ScriptedRule {
        keywords: &["recipe", "cook"],
        reply: "We have recipes for Authentic Jerk Chicken, Jerk Shrimp Tacos, Jerk Salmon, Escovitch Fish, Jerk Chicken Wings, and the Pikliz Burger at jamaicahousebrand.com/recipes. Grab a bottle of Original Jerk Sauce and you're halfway there!",
    },
    ScriptedRule {
        keywords: &["story", "history", "chef", "founder"],
        reply: "Chef Anthony's father ran Jamaica House restaurants in South Florida for over 30 years, and 92% of customers asked to buy the sauce. Jamaica House Brand brings that authentic restaurant experience to your kitchen!",
    },
    ScriptedRule {
        keywords: &["human", "person", "agent", "someone", "whatsapp", "phone"],
        reply: "You can reach a real person on WhatsApp at +1 (786) 709-1027. We're happy to help!",
    },
];

/// Keyword-matched canned replies. Needs no credentials and answers in
/// constant time, which also makes it the provider the test suite runs
/// against.
pub struct ScriptedChatService {}

impl ScriptedChatService {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ScriptedChatService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenericChatService for ScriptedChatService {
    async fn generate_reply(
        &self,
        message: &str,
        _history: &[ChatTurn],
    ) -> Result<String, anyhow::Error> {
        let normalized = message.to_lowercase();
        let reply = SCRIPTED_RULES
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|keyword| normalized.contains(keyword))
            })
            .map(|rule| rule.reply)
            .unwrap_or(
                "I'm not sure about that one! Reach out to us on WhatsApp at +1 (786) 709-1027 and we'll get you sorted.",
            );
        Ok(reply.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

pub struct LlmChatService {
    http_client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    temperature: f32,
    history_limit: usize,
}

impl LlmChatService {
    pub fn new(chat_config: &ChatSettings) -> Self {
        tracing::info!("Establishing connection to the chat completion server.");
        let http_client = Client::builder()
            .timeout(chat_config.timeout())
            .build()
            .unwrap();
        Self {
            http_client,
            base_url: chat_config.base_url.clone(),
            api_key: chat_config.api_key.clone(),
            model: chat_config.model.clone(),
            max_tokens: chat_config.max_tokens,
            temperature: chat_config.temperature,
            history_limit: chat_config.history_limit,
        }
    }

    fn get_auth_token(&self) -> String {
        format!("Bearer {}", self.api_key.expose_secret())
    }
}

#[async_trait]
impl GenericChatService for LlmChatService {
    async fn generate_reply(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, anyhow::Error> {
        let window_start = history.len().saturating_sub(self.history_limit);
        let mut messages = Vec::with_capacity(history.len() - window_start + 2);
        messages.push(ChatCompletionMessage {
            role: "system",
            content: SYSTEM_PROMPT,
        });
        for turn in &history[window_start..] {
            messages.push(ChatCompletionMessage {
                role: turn.role.as_str(),
                content: &turn.content,
            });
        }
        messages.push(ChatCompletionMessage {
            role: "user",
            content: message,
        });
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.get_auth_token())
            .json(&request_body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Chat provider returned {}: {}", status, body));
        }
        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| anyhow::anyhow!(format!("Failed to parse response: {}", err)))?;
        let reply = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION_REPLY.to_string());
        Ok(reply)
    }
}
