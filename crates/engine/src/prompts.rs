// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed prompt text handed to the agent and the image capability.

/// Instructions appended to every job prompt before it reaches the agent.
pub const AUTHORING_INSTRUCTIONS: &str = "\
We are using Phaser 3 to make web games. First read all the files in the resources folder. \
When you are done, please summarize what you made and how you did it, and tag the game \
with one or two genres (for example Puzzle, Shooter, Roguelike).

For certain games you may need images. Never load images from a CDN \
(for example `this.load.setBaseURL('https://cdn.phaserfiles.com/v385')`); always use local \
files from the assets folder. The assets folder starts empty: call the `generate_image` tool \
with a file name and a prompt, then point the Phaser code at the returned path. If a STYLE is \
requested, carry it into every image prompt. Generated images are 1024x1024, so size sprites \
with setDisplaySize(). Before finishing, call the `validate` tool on your entry file and fix \
every issue it reports.";

/// Full agent prompt for one job.
pub fn agent_prompt(job_prompt: &str) -> String {
    format!("{job_prompt}\n\n{AUTHORING_INSTRUCTIONS}")
}

/// Merge two completed prompts into a single hybrid instruction.
pub fn hybrid_prompt(first: &str, second: &str) -> String {
    format!(
        "Combine the following two prompts below in brackets to create one game in phaser.js \
         that is a blend of both:\n{{ {first} }}\n{{ {second} }}"
    )
}

/// Square box art for the game library.
pub fn cover_art_prompt(job_prompt: &str) -> String {
    format!(
        "Square retro game cartridge cover art, bold title-free illustration, 1:1 aspect ratio, \
         for this game: {job_prompt}"
    )
}

/// Tall banner for the game detail page.
pub fn banner_art_prompt(job_prompt: &str) -> String {
    format!(
        "Tall vertical banner art, 9:16 aspect ratio, scenic key art without text, \
         for this game: {job_prompt}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hybrid_wraps_each_prompt_in_braces() {
        let prompt = hybrid_prompt("make a snake game", "make a breakout game");
        assert!(prompt.ends_with("\n{ make a snake game }\n{ make a breakout game }"));
        assert!(prompt.starts_with("Combine the following two prompts"));
    }

    #[test]
    fn agent_prompt_keeps_job_prompt_first() {
        let prompt = agent_prompt("make me a snake game using phaser.js");
        assert!(prompt.starts_with("make me a snake game using phaser.js\n\nWe are using Phaser 3"));
    }

    #[test]
    fn art_prompts_mention_shape() {
        assert!(cover_art_prompt("x").contains("Square"));
        assert!(banner_art_prompt("x").contains("Tall"));
    }
}
