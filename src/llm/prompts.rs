/// Build the blog-writing prompt for a video transcript.
///
/// The transcript is embedded verbatim; an empty transcript is not rejected.
pub fn build_blog_prompt(transcript: &str, word_count: u32) -> String {
    format!(
        "You are a talented blog writer.\n\
\n\
Based on the following YouTube video transcript:\n\
\n\
{transcript}\n\
\n\
Write a blog post summarizing the main ideas of the video.\n\
Keep it engaging, easy to understand, and approximately {word_count} words.\n\
Structure it into an **introduction**, **main body**, and **conclusion** clearly.\n\
\n\
Avoid copying sentences directly from the transcript. Rewrite in your own words."
    )
}
