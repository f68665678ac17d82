//! Image generation command.

use parley_types::llm::ImageModelType;

use super::OutputMode;
use crate::state::AppState;

/// Generate one image and print its URL. The URL may be empty.
pub async fn generate_image(
    state: &AppState,
    model: ImageModelType,
    prompt: &str,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let image_url = state.images.generate(model, prompt).await?;

    match mode {
        OutputMode::Json => {
            let out = serde_json::json!({ "imageUrl": image_url });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Plain => println!("{image_url}"),
        OutputMode::Styled if image_url.is_empty() => {
            println!(
                "  {} {} returned no image",
                console::style("!").yellow().bold(),
                model
            );
        }
        OutputMode::Styled => {
            println!("  {}", console::style(&image_url).cyan().underlined());
        }
    }
    Ok(())
}
