use std::fs::File;
use std::io::Write;

use maze_config::{MazeSquareRow, load_maze_csv, read_maze_csv};
use rstest::rstest;
use tempfile::tempdir;

const HEADER: &str = "x,y,x_plus,x_minus,y_plus,y_minus,is_start,is_finish";

#[test]
fn loads_two_cell_corridor_from_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("corridor.csv");
    let mut f = File::create(&path).expect("create");
    writeln!(f, "{HEADER}").expect("write");
    writeln!(f, "1,1,false,false,true,false,true,false").expect("write");
    writeln!(f, "1,2,false,false,false,true,false,true").expect("write");
    drop(f);

    let rows = load_maze_csv(&path).expect("load");
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        MazeSquareRow {
            x: 1,
            y: 1,
            x_plus: false,
            x_minus: false,
            y_plus: true,
            y_minus: false,
            is_start: true,
            is_finish: false,
        }
    );
    assert!(rows[1].is_finish);
}

#[test]
fn rejects_wrong_headers() {
    let data = "x,y,east,west,north,south,start,finish\n1,1,true,true,true,true,true,true\n";
    let err = read_maze_csv(data.as_bytes(), "inline").expect_err("bad headers");
    assert!(err.to_string().contains("must have headers"));
}

#[rstest]
#[case("1,1,true,false,false,false,false,true\n", "exactly one start")]
#[case("1,1,true,false,false,false,true,false\n", "no finish")]
#[case(
    "1,1,true,false,false,false,true,false\n1,1,false,true,false,false,false,true\n",
    "twice"
)]
#[case("1,1,yes,false,false,false,true,true\n", "invalid CSV row 2")]
fn rejects_unusable_layouts(#[case] body: &str, #[case] expected: &str) {
    let data = format!("{HEADER}\n{body}");
    let err = read_maze_csv(data.as_bytes(), "inline").expect_err("should reject");
    assert!(
        err.to_string().contains(expected),
        "error '{err}' should contain '{expected}'"
    );
}

#[test]
fn missing_file_reports_path() {
    let err = load_maze_csv(std::path::Path::new("/definitely/not/here.csv")).expect_err("missing");
    assert!(err.to_string().contains("here.csv"));
}
