use crate::chat::{ContentPart, GenerationRequest, Message};

pub const DEFAULT_MODEL: &str = "Llama-3.2-11B-Vision-Instruct";

pub const DEFAULT_MAX_TOKENS: u32 = 3000;

pub const DEFAULT_USER_TEXT: &str = "Turn this wireframe into a working web app.";

/// Fixed instructions sent with every page capture.
pub const INSTRUCTIONS: &str = "\
You are an expert front-end developer who turns low-fidelity wireframes into working prototypes.
You receive an image of a diagram page drawn by a designer.

Rules:
- Build a single self-contained HTML document. Inline all CSS and JavaScript.
- Use Tailwind CSS from its CDN for styling. Do not reference any other external files.
- Reproduce every element of the wireframe: layout, labels, buttons, inputs and lists.
- Text written in red or inside sticky notes are annotations for you, not part of the UI.
- Make interactive elements work where their purpose is obvious.
- Use placeholder images from https://placehold.co when an image is drawn.";

/// Last part of the message; tells the model how to hand back the result.
pub const CLOSING_DIRECTIVE: &str = "\
Reply with the complete document inside a ```html fenced code block. \
If you revise your answer, put the final version in the last ```html block.";

/// Inputs for one generation request.
#[derive(Clone)]
pub struct AppRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    /// What the user asked for, in their own words.
    pub user_text: &'a str,
    /// `data:` URL of the rendered page.
    pub image_data_url: &'a str,
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

/// A single user-role message: user text, page image, instructions, directive.
pub fn build_messages(user_text: &str, image_data_url: &str) -> Vec<Message> {
    vec![Message::user(vec![
        ContentPart::text(user_text),
        ContentPart::image_url(image_data_url),
        ContentPart::text(INSTRUCTIONS),
        ContentPart::text(CLOSING_DIRECTIVE),
    ])]
}

pub fn build_request(request: &AppRequest<'_>) -> GenerationRequest {
    GenerationRequest {
        api_key: request.api_key.to_string(),
        model: request.model.to_string(),
        messages: build_messages(request.user_text, request.image_data_url),
        max_tokens: request.max_tokens,
        stream: request.stream,
    }
}
