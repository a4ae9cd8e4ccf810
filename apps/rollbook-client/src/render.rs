//! Plain-text rendering of server responses.

use crate::Student;
use std::fmt::Write;

const HEADER: [&str; 11] = [
    "Roll", "Name", "Age", "Branch", "M1", "M2", "M3", "M4", "M5", "%", "Grade",
];

/// Render students as a fixed-width table. `ranked` adds a 1-based rank column.
#[must_use]
pub fn table(students: &[Student], ranked: bool) -> String {
    if students.is_empty() {
        return "No students found.\n".to_string();
    }

    let mut out = String::new();
    if ranked {
        out.push_str("Rank  ");
    }
    let _ = writeln!(
        out,
        "{:<6} {:<20} {:>3} {:<16} {:>3} {:>3} {:>3} {:>3} {:>3} {:>7} {:>5}",
        HEADER[0],
        HEADER[1],
        HEADER[2],
        HEADER[3],
        HEADER[4],
        HEADER[5],
        HEADER[6],
        HEADER[7],
        HEADER[8],
        HEADER[9],
        HEADER[10]
    );

    for (i, s) in students.iter().enumerate() {
        if ranked {
            let _ = write!(out, "{:<4}  ", i + 1);
        }
        let [m1, m2, m3, m4, m5] = s.marks();
        let _ = writeln!(
            out,
            "{:<6} {:<20} {:>3} {:<16} {:>3} {:>3} {:>3} {:>3} {:>3} {:>7.2} {:>5}",
            s.roll, s.name, s.age, s.branch, m1, m2, m3, m4, m5, s.percentage, s.grade
        );
    }
    out
}

/// Render one student as labelled lines.
#[must_use]
pub fn detail(s: &Student) -> String {
    let [m1, m2, m3, m4, m5] = s.marks();
    format!(
        "Roll:       {}\nName:       {}\nAge:        {}\nBranch:     {}\n\
         Marks:      {} {} {} {} {}\nPercentage: {:.2}\nGrade:      {}\n",
        s.roll, s.name, s.age, s.branch, m1, m2, m3, m4, m5, s.percentage, s.grade
    )
}
