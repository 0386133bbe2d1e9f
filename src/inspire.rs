use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A verse and a dua for the day, each with Arabic text and both
/// translations. Served to the public home page; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyInspiration {
    pub verse: Verse,
    pub dua: Dua,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    pub arabic: String,
    pub english: String,
    pub bengali: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dua {
    pub arabic: String,
    pub english: String,
    pub bengali: String,
}

/// Boundary to whatever supplies the daily content. Implementations may go
/// to the network; the daemon only ever sees Ok or Err.
pub trait InspirationProvider {
    fn fetch(&self) -> anyhow::Result<DailyInspiration>;
}

/// Reads `inspiration.json` from the workspace, where an external process
/// (or the operator) may drop refreshed content. Missing or malformed files
/// are provider errors, not crashes.
pub struct WorkspaceFileProvider {
    path: PathBuf,
}

impl WorkspaceFileProvider {
    pub fn new(workspace: &Path) -> WorkspaceFileProvider {
        WorkspaceFileProvider {
            path: workspace.join("inspiration.json"),
        }
    }
}

impl InspirationProvider for WorkspaceFileProvider {
    fn fetch(&self) -> anyhow::Result<DailyInspiration> {
        let text = std::fs::read_to_string(&self.path)?;
        let parsed: DailyInspiration = serde_json::from_str(&text)?;
        Ok(parsed)
    }
}

/// Fixed content served whenever the provider fails. The failure is logged
/// for diagnostics and never shown to the end user as an error.
pub fn fallback() -> DailyInspiration {
    DailyInspiration {
        verse: Verse {
            arabic: "فَإِنَّ مَعَ الْعُسْرِ يُسْرًا".to_string(),
            english: "For indeed, with hardship [will be] ease.".to_string(),
            bengali: "নিশ্চয়ই কষ্টের সাথে স্বস্তি রয়েছে।".to_string(),
            reference: "Qur'an 94:5".to_string(),
        },
        dua: Dua {
            arabic: "رَبَّنَا آتِنَا فِي الدُّنْيَا حَسَنَةً وَفِي الْآخِرَةِ حَسَنَةً وَقِنَا عَذَابَ النَّارِ"
                .to_string(),
            english: "Our Lord, give us in this world [that which is] good and in the Hereafter \
                      [that which is] good and protect us from the punishment of the Fire."
                .to_string(),
            bengali: "হে আমাদের প্রতিপালক, আমাদেরকে দুনিয়াতে কল্যাণ দান করুন এবং আখেরাতেও কল্যাণ দান করুন এবং আমাদেরকে আগুনের আযাব থেকে রক্ষা করুন।"
                .to_string(),
        },
    }
}

/// One-shot, best-effort fetch with fallback substitution. No retries.
/// Returns the content and whether it is the fallback.
pub fn daily_inspiration(provider: &dyn InspirationProvider) -> (DailyInspiration, bool) {
    match provider.fetch() {
        Ok(content) => (content, false),
        Err(e) => {
            eprintln!("inspiration provider failed, serving fallback: {e:#}");
            (fallback(), true)
        }
    }
}
