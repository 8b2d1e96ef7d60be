pub mod controller;
pub mod perturbation;
pub mod reveal;
pub mod script;
pub mod session;

pub use controller::{AcceptStatus, Accepted, RevealController, TranscriptFrame};
pub use perturbation::{PerturbationSource, SeededPerturbation};
pub use reveal::{Pacing, RevealEngine};
pub use script::{build_script, NarrativeTone, Script, ScriptOptions};
pub use session::{RevealSession, SessionPhase, SessionView};
