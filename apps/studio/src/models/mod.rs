pub mod resume;
pub mod visual;

pub use resume::{Contact, EducationEntry, ExperienceEntry, HardSkill, ResumeDocument};
pub use visual::{VisualConfig, VisualConfigError, VisualConfigPatch};
