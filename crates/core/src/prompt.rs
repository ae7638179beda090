//! Prompt templates for the four generation steps.
//!
//! Every builder is plain interpolation: fields are inserted verbatim, empty
//! fields stay empty, and the same request always yields the same prompt.

use crate::types::GenerationRequest;

/// Prompt asking for `count` numbered titles with a short rationale each.
pub fn title_prompt(request: &GenerationRequest, count: usize) -> String {
    format!(
        r#"As a YouTube SEO expert, generate {count} compelling, click-worthy titles for a {video_type} video targeting {audience}.

Content Summary: {content}

Requirements:
- Primary Keywords: {keywords}
- Tone: {tone}
- Style Preferences: {style}
- Character count: 40-70 characters
- Include power words and emotional triggers
- Ensure SEO optimization
- Avoid clickbait but maintain curiosity
- Include numbers where relevant
- Consider trending formats

Provide exactly {count} titles, numbered 1-{count}, with brief explanations of why each title works.
"#,
        count = count,
        video_type = request.video_type,
        audience = request.target_audience,
        content = request.content,
        keywords = request.keywords,
        tone = request.tone,
        style = request.style_preferences,
    )
}

pub fn description_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"As a YouTube SEO specialist, write a comprehensive, SEO-optimized description for a {video_type} video targeting {audience}.

Video Summary: {content}
Channel Information: {channel}
Target Keywords: {keywords}
Estimated Video Length: {length}

Structure the description with:
1. Hook (first 125 characters - crucial for search results)
2. Detailed video overview (200-300 words)
3. Key timestamps (create realistic placeholders)
4. Call-to-action section
5. Social media links placeholder
6. 5-8 relevant hashtags
7. Additional resources/links section

Focus on:
- SEO keyword integration
- Engaging first paragraph
- Clear value proposition
- Community engagement elements
- Accessibility considerations
"#,
        video_type = request.video_type,
        audience = request.target_audience,
        content = request.content,
        channel = request.channel_info,
        keywords = request.keywords,
        length = request.video_length,
    )
}

/// Asks for labeled "Primary tags:", "Secondary tags:" and "Trending tags:"
/// sections, which is what [`crate::parse::extract_tags`] looks for.
pub fn tags_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"Generate 20 strategic YouTube tags for a {video_type} video to maximize discoverability.

Video Content: {content}
Primary Keywords: {keywords}
Competitor Insights: {competitors}

Provide tags in three categories:
1. Primary tags (5-7): Main topic keywords
2. Secondary tags (8-10): Related and long-tail keywords
3. Trending tags (5-7): Current trending topics in the niche

Format: Return each category on its own line as a comma-separated list, starting with its label exactly as "Primary tags:", "Secondary tags:" or "Trending tags:".
"#,
        video_type = request.video_type,
        content = request.content,
        keywords = request.keywords,
        competitors = request.competitor_keywords,
    )
}

pub fn thumbnail_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"Suggest 5 effective thumbnail concepts for a {video_type} video targeting {audience}.

Video Content: {content}

For each thumbnail concept, provide:
1. Visual elements description
2. Text overlay suggestions (max 6 words)
3. Color scheme recommendations
4. Emotional appeal strategy
5. A/B testing variations

Focus on:
- High contrast and readability
- Emotional expressions if featuring people
- Clear visual hierarchy
- Mobile optimization
- Brand consistency
"#,
        video_type = request.video_type,
        audience = request.target_audience,
        content = request.content,
    )
}
