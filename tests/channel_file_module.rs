use envprompt::channel::{Channel, FileChannel, Snapshot};
use std::fs;
use tempfile::tempdir;

fn values(pairs: &[(&str, &str)]) -> Snapshot {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn channel_file_module_updates_in_place_and_appends_new_keys() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join(".env");
    fs::write(
        &path,
        "# service settings\nexport PORT=80\n\nHOST=localhost # local only\n",
    )
    .expect("seed env file");
    let mut channel = FileChannel::new(&path);

    channel
        .set(&values(&[("PORT", "3000"), ("GREETING", "hello world")]))
        .expect("set values");

    assert_eq!(
        fs::read_to_string(&path).expect("read env file"),
        "# service settings\nexport PORT=3000\n\nHOST=localhost # local only\nGREETING=\"hello world\"\n"
    );
    assert_eq!(
        channel.get().expect("get values"),
        values(&[
            ("GREETING", "hello world"),
            ("HOST", "localhost"),
            ("PORT", "3000")
        ])
    );
}

#[test]
fn channel_file_module_quoted_values_read_back_exactly() {
    let temp = tempdir().expect("tempdir");
    let mut channel = FileChannel::new(temp.path().join("app.env"));
    let tricky = "say \"hi\" # not a comment\\n";

    channel
        .set(&values(&[("MOTD", tricky)]))
        .expect("set value");

    let snapshot = channel.get().expect("get values");
    assert_eq!(snapshot.get("MOTD").map(String::as_str), Some(tricky));
}

#[test]
fn channel_file_module_describes_its_path() {
    let channel = FileChannel::new("config/.env");
    assert_eq!(channel.describe(), "file config/.env");
}
