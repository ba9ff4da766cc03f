//! Prompt construction
//!
//! Canonical prompt templates for the two generation modes, the update flow,
//! and the image-URL splice. The `{USER_PROMPT}` slot is substituted with the
//! user's request; templates end with the raw-JSON output contract the
//! extractor depends on.

use super::GenerationMode;

/// Escalation suffix appended on the retry attempt
pub const STRICT_JSON_SUFFIX: &str = "\n\nRETURN ONLY RAW JSON.";

/// Placeholder substituted with the user's request text
const USER_PROMPT_SLOT: &str = "{USER_PROMPT}";

/// Single-page website template
pub const MASTER_PROMPT: &str = r#"YOU ARE A PRINCIPAL FRONTEND ARCHITECT AND A SENIOR UI/UX ENGINEER
SPECIALIZED IN RESPONSIVE DESIGN SYSTEMS.

You build high-end, production-grade websites using ONLY HTML, CSS, and
JavaScript that work on all screen sizes. The output must be
client-deliverable without any modification.

- NO frameworks
- NO external libraries
- NO placeholders
- NO non-responsive layouts

--------------------------------------------------
USER REQUIREMENT:
{USER_PROMPT}
--------------------------------------------------

GLOBAL QUALITY BAR (NON-NEGOTIABLE)
- Premium, modern UI
- Professional typography and spacing
- Clean visual hierarchy
- Business-ready content (NO lorem ipsum)
- Smooth transitions and hover effects
- SPA-style multi-page experience
- Production-ready, readable code

RESPONSIVE DESIGN (ABSOLUTE REQUIREMENT)
You MUST implement a mobile-first CSS approach with responsive layouts for
mobile (<768px), tablet (768px-1024px), and desktop (>1024px), using CSS
Grid / Flexbox, relative units (%, rem, vw), and media queries.

Required responsive behavior:
- Navbar collapses / stacks on mobile
- Sections stack vertically on mobile
- Multi-column layouts become single-column on small screens
- Images scale proportionally and never overflow containers
- Text remains readable on all devices
- No horizontal scrolling on mobile
- Touch-friendly buttons on mobile

IMAGES (MANDATORY AND RESPONSIVE)
- Use high-quality images ONLY from https://images.unsplash.com/
- EVERY image URL MUST include: ?auto=format&fit=crop&w=1200&q=80
- Images must be responsive (max-width: 100%)

TECHNICAL RULES (VERY IMPORTANT)
- Output ONE single HTML file
- Exactly ONE <style> tag and exactly ONE <script> tag
- NO external CSS / JS / fonts; system fonts only
- iframe srcdoc compatible
- SPA-style navigation using JavaScript, no page reloads
- No dead UI, no broken buttons

SPA VISIBILITY RULE (MANDATORY)
- Pages MUST NOT be hidden permanently
- If .page { display: none } is used, then .page.active { display: block }
  is REQUIRED
- At least ONE page MUST be visible on initial load

REQUIRED SPA PAGES
- Home
- About
- Services / Features
- Contact

FUNCTIONAL REQUIREMENTS
- Navigation must switch pages using JS and update the active nav state
- Forms must have JS validation
- Buttons must show hover and active states
- Smooth section/page transitions

FINAL SELF-CHECK (MANDATORY)
Before responding, ensure the layout works on mobile, tablet, and desktop,
no horizontal scroll appears on mobile, all images are responsive, media
queries are present and used, navigation works on all screen sizes, and at
least one page is visible without user interaction.

--------------------------------------------------
OUTPUT FORMAT (RAW JSON ONLY)
--------------------------------------------------
{
  "message": "Short professional confirmation sentence",
  "code": "<FULL VALID HTML DOCUMENT>"
}

ABSOLUTE RULES
- RETURN RAW JSON ONLY
- NO markdown, NO explanations, NO extra text
- FORMAT MUST MATCH EXACTLY"#;

/// Full-stack application template
pub const FULL_STACK_PROMPT: &str = r#"YOU ARE A SENIOR FULL-STACK ARCHITECT SPECIALIZED IN BUILDING COMPLETE
WEB APPLICATIONS WITH FRONTEND AND BACKEND CODE.

--------------------------------------------------
USER REQUIREMENT:
{USER_PROMPT}
--------------------------------------------------

YOU MUST PROVIDE:

1. FRONTEND (HTML/CSS/JavaScript)
   - Responsive design (mobile, tablet, desktop)
   - Modern UI with smooth interactions
   - Form validation and API integration code
   - Error handling

2. BACKEND (Node.js/Express)
   - RESTful API endpoints
   - Request validation
   - Error handling middleware
   - CORS configuration and environment variable setup

3. DATABASE SCHEMA (if needed)
   - MongoDB/PostgreSQL schema, sample data structure, relationships

4. SETUP INSTRUCTIONS
   - How to install, configure, and run the application

TECHNICAL STACK
Frontend: HTML, CSS, JavaScript. Backend: Node.js + Express.
Database: MongoDB or PostgreSQL (based on requirements). Auth: JWT if needed.

--------------------------------------------------
OUTPUT FORMAT (RAW JSON ONLY)
--------------------------------------------------
{
  "message": "Brief description of the full-stack application",
  "code": "COMPLETE FRONTEND HTML CODE HERE",
  "backend": "COMPLETE BACKEND CODE HERE (server.js)",
  "database": "DATABASE SCHEMA/MODELS HERE",
  "setup": "SETUP INSTRUCTIONS HERE"
}

ABSOLUTE RULES
- RETURN RAW JSON ONLY
- NO markdown code blocks, NO explanations outside JSON
- ALL code must be production-ready with error handling
- FORMAT MUST MATCH EXACTLY"#;

/// Select the mode's template and substitute the user's request
pub fn build(mode: GenerationMode, user_prompt: &str) -> String {
    let template = match mode {
        GenerationMode::SinglePage => MASTER_PROMPT,
        GenerationMode::FullStack => FULL_STACK_PROMPT,
    };
    template.replace(USER_PROMPT_SLOT, user_prompt)
}

/// Build the update-flow prompt
///
/// Embeds the current document plus the change request; the model returns
/// the full updated document, never a diff.
pub fn update(existing_code: &str, request: &str) -> String {
    format!(
        r#"UPDATE THIS HTML WEBSITE.

CURRENT CODE:
{existing_code}

USER REQUEST:
{request}

RETURN RAW JSON ONLY:
{{
  "message": "Short confirmation",
  "code": "<UPDATED FULL HTML>"
}}"#
    )
}

/// Append an enumerated image-URL block to the prompt
///
/// The URLs are used verbatim instead of placeholder imagery.
pub fn with_image_urls(prompt: &str, urls: &[String]) -> String {
    if urls.is_empty() {
        return prompt.to_string();
    }

    let mut out = String::from(prompt);
    out.push_str(
        "\n\n--------------------------------------------------\n\
         AI-GENERATED IMAGES AVAILABLE\n\
         --------------------------------------------------\n\
         Use these AI-generated image URLs in your website:\n",
    );
    for (i, url) in urls.iter().enumerate() {
        out.push_str(&format!("Image {}: {}\n", i + 1, url));
    }
    out.push_str(
        "\nIMPORTANT:\n\
         - Use these URLs directly in <img> tags\n\
         - These are real AI-generated images matching the website theme\n\
         - Do NOT use placeholder images from Unsplash\n\
         - Add proper alt text describing each image\n",
    );
    out
}
