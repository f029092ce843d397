//! Inspiration seeds for new stories.

use rand::Rng;
use rand::seq::SliceRandom;

const IDEAS: &[&str] = &[
    "a map that redraws itself every night",
    "a city built on the back of a sleeping giant",
    "memories that can be traded at market",
    "a lighthouse whose beam reveals hidden doors",
    "rain that falls upward once a year",
    "a library where books bleed ink when lied about",
    "a guild of thieves who only steal time",
    "a comet that grants one wish to whoever sees it first",
    "a forest that migrates with the seasons",
    "bells that summon the dead to testify",
    "a train that never stops and never arrives",
    "a kingdom ruled by whoever holds an ordinary stone",
    "shadows that detach and live their own lives",
    "a sea made of glass that sings when walked on",
    "an island that appears only during eclipses",
    "a clockmaker who can pause a single heartbeat",
    "masks that swap the faces of their wearers",
    "a war fought entirely through music",
    "salt that preserves promises as well as food",
    "a tower that grows one floor for every secret told inside",
    "dreams that leak into the waking world as weather",
    "a post office that delivers letters to the past",
    "a desert where footprints remember who made them",
    "a plague of silence that steals voices",
    "an orchard whose fruit shows the eater's future",
    "mechanical birds that carry royal spies",
    "a river that flows between two moons",
    "a debt that passes down with a family's name",
    "a festival where everyone must tell the truth for a day",
    "a compass that points to what you fear most",
];

const NAMES: &[&str] = &[
    "Ada", "Bram", "Calla", "Doran", "Elowen", "Fenn", "Galen", "Hesper", "Ilse", "Jory",
    "Kestrel", "Lior", "Maren", "Nox", "Oriel", "Pell", "Quill", "Rhea", "Sable", "Tamsin",
    "Ulric", "Vesna", "Wren", "Xander", "Yara", "Zephyr", "Ashmoor", "Brindle Reach",
    "Coldharbor", "Duskvale", "Emberfall", "Greywater",
];

/// A random draw of ideas and names handed to the foundation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seeds {
    /// Story idea fragments
    pub ideas: Vec<&'static str>,
    /// Character and place names
    pub names: Vec<&'static str>,
}

impl Seeds {
    /// Draw up to `count` distinct ideas and `count` distinct names.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        Self {
            ideas: IDEAS.choose_multiple(rng, count).copied().collect(),
            names: NAMES.choose_multiple(rng, count).copied().collect(),
        }
    }
}
