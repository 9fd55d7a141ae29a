use anyhow::Result;

use super::make_rng;
use crate::caption::synthesize_styled;
use crate::color::Color;
use crate::mood::{interpret, validate_theme};

fn parse_color(color: Option<&str>) -> Result<Option<Color>> {
    Ok(color.map(Color::from_hex).transpose()?)
}

pub fn cmd_mood(theme: &str, color: Option<&str>, seed: Option<u64>, json: bool) -> Result<()> {
    let theme = validate_theme(theme)?;
    let color = parse_color(color)?;
    let result = interpret(theme, color.as_ref(), &mut make_rng(seed));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Mood:     {}", result.mood);
    println!("Hashtags: {}", result.hashtags);
    println!("Source:   {:?}", result.source);
    Ok(())
}

pub fn cmd_caption(theme: &str, count: usize, color: Option<&str>, seed: Option<u64>) -> Result<()> {
    let theme = validate_theme(theme)?;
    let color = parse_color(color)?;
    let mut rng = make_rng(seed);
    let mood = interpret(theme, color.as_ref(), &mut rng);

    println!("Mood: {} {}", mood.mood, mood.hashtags);
    println!();
    for i in 1..=count {
        let caption = synthesize_styled(mood.mood.tag(), &mood.hashtags, &mut rng);
        println!("{:>2}. [{:?}] {}", i, caption.style, caption.text);
    }
    Ok(())
}
