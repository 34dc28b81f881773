//! Storage paths for cover photos. The bytes themselves live in the external blob store.

use chrono::{Datelike, NaiveDate};

pub const PHOTO_PREFIX: &str = "photo/";
/// Width of the stored path, date directories included.
pub const PHOTO_MAX_LENGTH: usize = 100;

/// `photo/YYYY/MM/DD/<file>` for a file uploaded on `date`. Directory parts of `file_name` are dropped.
pub fn upload_path(date: NaiveDate, file_name: &str) -> Option<String> {
    let base = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")?;
    Some(format!(
        "{}{:04}/{:02}/{:02}/{}",
        PHOTO_PREFIX,
        date.year(),
        date.month(),
        date.day(),
        base
    ))
}

/// Normalize a submitted `post_photo` value: stored paths pass through, bare names are placed under `today`.
pub fn resolve_submitted(value: &str, today: NaiveDate) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with(PHOTO_PREFIX) && !value.contains("..") {
        return Some(value.to_string());
    }
    upload_path(today, value)
}

/// Field error for a stored path that does not fit its column.
pub fn path_too_long(path: &str) -> Option<String> {
    let len = path.chars().count();
    (len > PHOTO_MAX_LENGTH).then(|| {
        format!(
            "Ensure this filename has at most {} characters (it has {}).",
            PHOTO_MAX_LENGTH, len
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn upload_path_uses_zero_padded_date() {
        assert_eq!(upload_path(day(), "cover.jpg").as_deref(), Some("photo/2024/03/07/cover.jpg"));
    }

    #[test]
    fn upload_path_strips_directories() {
        assert_eq!(
            upload_path(day(), "../../etc/cover.png").as_deref(),
            Some("photo/2024/03/07/cover.png")
        );
        assert_eq!(upload_path(day(), "C:\\tmp\\x.gif").as_deref(), Some("photo/2024/03/07/x.gif"));
        assert_eq!(upload_path(day(), "dir/"), None);
    }

    #[test]
    fn stored_paths_are_kept() {
        assert_eq!(
            resolve_submitted("photo/2020/01/02/a.jpg", day()).as_deref(),
            Some("photo/2020/01/02/a.jpg")
        );
        assert_eq!(resolve_submitted("photo/../secret", day()).as_deref(), Some("photo/2024/03/07/secret"));
        assert_eq!(resolve_submitted("   ", day()), None);
    }

    #[test]
    fn length_limit_counts_the_date_directories() {
        let fits = format!("{}.jpg", "a".repeat(79));
        let path = resolve_submitted(&fits, day()).unwrap();
        assert_eq!(path.chars().count(), PHOTO_MAX_LENGTH);
        assert_eq!(path_too_long(&path), None);

        let over = format!("{}.jpg", "a".repeat(80));
        let path = resolve_submitted(&over, day()).unwrap();
        assert_eq!(
            path_too_long(&path).as_deref(),
            Some("Ensure this filename has at most 100 characters (it has 101).")
        );
    }
}
