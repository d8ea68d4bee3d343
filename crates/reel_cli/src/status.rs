//! `reel status`: dry run of the skip rule.

use reel_cache::{CacheError, Decision};
use reel_transcode::{plan, PlannedSource};

use crate::pipeline::{load_project, status};
use crate::{GlobalArgs, ReportFormat, StatusArgs};

/// Runs the `reel status` command.
///
/// Prints one line per source in path order: `fresh` or `stale` with the
/// reason. Nothing on disk is modified. Returns exit code 0.
pub fn run(args: &StatusArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let manifest = project.store().load();

    let planned = match plan(
        &project.tree(),
        &project.video.dist,
        &project.video.settings,
        &manifest,
    ) {
        Ok(planned) => planned,
        Err(CacheError::SourceRootMissing { path }) => {
            status(
                global,
                "Missing",
                format!("source directory {}", project.display(&path)),
            );
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    match args.format {
        ReportFormat::Text => {
            for line in plan_lines(&planned) {
                println!("{line}");
            }
            let stale = planned.iter().filter(|p| p.decision.needs_transcode()).count();
            status(
                global,
                "Status",
                format!("{} source(s), {stale} to transcode", planned.len()),
            );
        }
        ReportFormat::Json => {
            let items: Vec<_> = planned
                .iter()
                .map(|p| {
                    let (action, reason) = describe(p.decision);
                    serde_json::json!({
                        "source": p.source.key(),
                        "action": action,
                        "reason": reason,
                        "signature": p.signature.to_string(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }
    Ok(0)
}

fn describe(decision: Decision) -> (&'static str, Option<String>) {
    match decision {
        Decision::Skip => ("fresh", None),
        Decision::Transcode(reason) => ("stale", Some(reason.to_string())),
    }
}

/// Formats one text line per planned source.
fn plan_lines(planned: &[PlannedSource]) -> Vec<String> {
    planned
        .iter()
        .map(|p| match describe(p.decision) {
            (action, None) => format!("{action:<6} {}", p.source.key()),
            (action, Some(reason)) => format!("{action:<6} {} ({reason})", p.source.key()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_cache::{SourceFile, StaleReason};
    use reel_common::{Signature, SourceStat};
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn planned(rel: &str, decision: Decision) -> PlannedSource {
        PlannedSource {
            source: SourceFile {
                path: PathBuf::from("/src").join(rel),
                rel: PathBuf::from(rel),
            },
            stat: SourceStat::new(1, SystemTime::UNIX_EPOCH),
            signature: Signature::from_bytes(rel.as_bytes()),
            decision,
        }
    }

    #[test]
    fn lines_show_action_and_reason() {
        let lines = plan_lines(&[
            planned("a.mp4", Decision::Skip),
            planned(
                "hero/b.mp4",
                Decision::Transcode(StaleReason::SignatureChanged),
            ),
        ]);
        assert_eq!(lines[0], "fresh  a.mp4");
        assert_eq!(lines[1], "stale  hero/b.mp4 (signature changed)");
    }

    #[test]
    fn status_does_not_touch_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("reel.toml"), "[project]\nname=\"t\"\n").unwrap();
        let src = tmp.path().join("src/assets/video");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("clip.mp4"), b"v").unwrap();

        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        let args = StatusArgs {
            format: ReportFormat::Json,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        assert!(!tmp.path().join(".reel").exists());
        assert!(!tmp.path().join("dist").exists());
    }
}
