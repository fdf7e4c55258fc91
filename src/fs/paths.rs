//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::{sanitize_filename, sanitize_path_component};
use crate::resource::ResourceDescriptor;

/// Destination of a resource: `<root>/<course>/<subfolder...>/<file>`.
///
/// Course and folder names keep their spaces; the file name does not.
pub fn destination_for(root: &Path, resource: &ResourceDescriptor) -> Result<PathBuf> {
    let mut path = root.join(sanitize_path_component(&resource.course)?);

    for folder in &resource.subdir {
        path.push(sanitize_path_component(folder)?);
    }

    path.push(sanitize_filename(&resource.file_name)?);
    Ok(path)
}

/// Hidden sibling of `destination` used while a transfer is in flight.
pub fn temp_path_for(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_name = format!(".{}.part-{}", name, uuid::Uuid::new_v4().simple());

    destination.with_file_name(temp_name)
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;

    fn resource(course: &str, subdir: &[&str], file_name: &str) -> ResourceDescriptor {
        ResourceDescriptor {
            course: course.to_string(),
            subdir: subdir.iter().map(|s| s.to_string()).collect(),
            file_name: file_name.to_string(),
            url: "https://portal.example/x".to_string(),
            marker: String::new(),
            kind: ResourceKind::Courseware,
        }
    }

    #[test]
    fn test_destination_at_course_root() {
        let path = destination_for(Path::new("/data"), &resource("CourseX", &[], "F1.pdf")).unwrap();
        assert_eq!(path, PathBuf::from("/data/CourseX/F1.pdf"));
    }

    #[test]
    fn test_destination_nested_and_sanitized() {
        let path = destination_for(
            Path::new("/data"),
            &resource("C: Intro", &["Week1", "Lab?"], "a.pdf"),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/data/C_ Intro/Week1/Lab_/a.pdf"));
    }

    #[test]
    fn test_destination_file_name_spaces_replaced() {
        let path = destination_for(
            Path::new("/data"),
            &resource("Course X", &["Week 1"], "课件 1.pdf"),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/data/Course X/Week 1/课件_1.pdf"));
    }

    #[test]
    fn test_destination_rejects_traversal() {
        assert!(destination_for(Path::new("/data"), &resource("C", &[".."], "a.pdf")).is_err());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/data/C/a.pdf"));
        assert_eq!(temp.parent(), Some(Path::new("/data/C")));
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".a.pdf.part-"));
    }
}
