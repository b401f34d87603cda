//! Shared pieces of the command-line tools.

use std::fmt;
use std::path::Path;

use modres_algebra::{open_header, GroupError, Header};
use tracing::Level;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Installs a stderr logger; each `-v` raises the level by one step from
/// `WARN`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbosity: u8) -> Result<(), TryInitError> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
}

/// The `group-info` report of one group.
#[derive(Clone, Debug)]
pub struct GroupReport<'a> {
    /// Name shown for the group.
    pub name: &'a Path,
    /// The `.nontips` header.
    pub header: Header,
    /// Jennings dimensions, if the ordering uses them.
    pub dims: Option<&'a [u32]>,
}

impl fmt::Display for GroupReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = &self.header;
        writeln!(f, "Group name : {}", self.name.display())?;
        writeln!(f, "Group order: {}^{}", header.p, header.order_exponent())?;
        writeln!(f, "Chosen ordering: {}", header.ordering.name())?;
        writeln!(f, "Number of generators  : {}", header.arrows)?;
        writeln!(f, "Size of Groebner basis: {}", header.mintips)?;
        writeln!(f, "Maximal nontip length : {}", header.maxlength)?;
        if let Some(dims) = self.dims {
            let list: Vec<String> = dims.iter().map(u32::to_string).collect();
            writeln!(f, "Dimensions of Jennings generators: {}", list.join(", "))?;
        }
        Ok(())
    }
}

/// The `group-info` report for the `.nontips` (and `.dims`) files of
/// `stem`.
///
/// # Errors
///
/// Fails if the header or the dimensions cannot be read.
pub fn group_info(stem: &Path) -> Result<String, GroupError> {
    let (header, dims) = open_header(stem)?;
    let report = GroupReport {
        name: stem,
        header,
        dims: dims.as_deref(),
    };
    Ok(report.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modres_algebra::{save_group, small_groups, ErrorKind, PathOrdering};

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("modres-cli-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_report_for_q8() {
        let dir = scratch("q8");
        let stem = dir.join("q8");
        let q8 = small_groups::quaternion_8().builder().build().unwrap();
        save_group(&q8, &stem).unwrap();
        let report = group_info(&stem).unwrap();
        let expected = format!(
            "Group name : {}\n\
             Group order: 2^3\n\
             Chosen ordering: Reverse length lexicographical\n\
             Number of generators  : 2\n\
             Size of Groebner basis: {}\n\
             Maximal nontip length : 4\n",
            stem.display(),
            q8.mintips()
        );
        assert_eq!(report, expected);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_report_lists_jennings_dims() {
        let dir = scratch("jennings");
        let stem = dir.join("c3c3");
        let g = small_groups::elementary_abelian(3, 2)
            .builder()
            .with_ordering(PathOrdering::Jennings)
            .with_dims(vec![1, 1])
            .build()
            .unwrap();
        save_group(&g, &stem).unwrap();
        let report = group_info(&stem).unwrap();
        assert!(report.contains("Chosen ordering: Jennings\n"));
        assert!(report.ends_with("Dimensions of Jennings generators: 1, 1\n"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_report_from_header() {
        let header = Header {
            p: 3,
            nontips: 9,
            arrows: 2,
            mintips: 3,
            maxlength: 4,
            ordering: PathOrdering::Jennings,
        };
        let dims = [1u32, 2];
        let report = GroupReport {
            name: Path::new("c3c3"),
            header,
            dims: Some(dims.as_slice()),
        };
        let lines: Vec<String> = report.to_string().lines().map(str::to_owned).collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Group name : c3c3");
        assert_eq!(lines[1], "Group order: 3^2");
        assert_eq!(lines[6], "Dimensions of Jennings generators: 1, 2");

        let plain = GroupReport { dims: None, ..report };
        assert_eq!(plain.to_string().lines().count(), 6);
    }

    #[test]
    fn test_missing_files_are_io_errors() {
        let err = group_info(Path::new("/nonexistent/modres/stem")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
