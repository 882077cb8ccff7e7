//! Reordering of Markdown bullet lists: open items first, struck-through
//! (`~~done~~`) items last. Lines that are not bullets keep their position.

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)([-+*])(\s+)(.*)$").expect("valid bullet regex"));

const STRIKE: &str = "~~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletLine<'a> {
	pub indent: &'a str,
	pub marker: char,
	pub spacing: &'a str,
	pub content: &'a str,
	pub struck: bool,
}

impl BulletLine<'_> {
	fn reassemble(&self, out: &mut String) {
		out.push_str(self.indent);
		out.push(self.marker);
		out.push_str(self.spacing);
		out.push_str(self.content);
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
	Bullet(BulletLine<'a>),
	Plain(&'a str),
}

pub fn classify(line: &str) -> Line<'_> {
	let Some(caps) = BULLET_RE.captures(line) else { return Line::Plain(line) };
	let (Some(indent), Some(marker), Some(spacing), Some(content)) = (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) else {
		return Line::Plain(line);
	};
	let Some(marker) = marker.as_str().chars().next() else { return Line::Plain(line) };
	let content = content.as_str();
	Line::Bullet(BulletLine {
		indent: indent.as_str(),
		marker,
		spacing: spacing.as_str(),
		content,
		struck: content.contains(STRIKE),
	})
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortReport {
	pub text: String,
	/// Number of bullet lines found.
	pub bullets: usize,
	/// How many of them were struck through.
	pub struck: usize,
	/// Bullet lines that ended up in a different slot.
	pub moved: usize,
}

/// Sorts the bullet lines of `text` and reports what happened.
///
/// Bullets are stably partitioned (open before struck-through) and written
/// back into the slots bullets occupied; plain lines stay where they were.
/// With no bullets at all the input is returned untouched.
pub fn sort_report(text: &str) -> SortReport {
	let lines: Vec<Line> = text.split('\n').map(classify).collect();
	let bullets: Vec<(usize, &BulletLine)> = lines
		.iter()
		.enumerate()
		.filter_map(|(i, l)| match l {
			Line::Bullet(b) => Some((i, b)),
			Line::Plain(_) => None,
		})
		.collect();
	if bullets.is_empty() {
		return SortReport { text: text.to_string(), bullets: 0, struck: 0, moved: 0 };
	}

	let (open, done): (Vec<_>, Vec<_>) = bullets.iter().partition(|(_, b)| !b.struck);
	let struck = done.len();
	let ordered: Vec<&(usize, &BulletLine)> = open.into_iter().chain(done).collect();

	let mut out = String::with_capacity(text.len());
	let mut next = ordered.iter();
	let mut moved = 0usize;
	for (i, line) in lines.iter().enumerate() {
		if i > 0 {
			out.push('\n');
		}
		match line {
			Line::Plain(p) => out.push_str(p),
			Line::Bullet(_) => {
				// one slot per bullet, so `next` cannot run dry here
				if let Some((from, b)) = next.next() {
					if *from != i {
						moved += 1;
					}
					b.reassemble(&mut out);
				}
			}
		}
	}
	log::debug!("sorted {} bullets ({} struck, {} moved)", bullets.len(), struck, moved);
	SortReport { text: out, bullets: bullets.len(), struck, moved }
}

pub fn sort_bullets(text: &str) -> String {
	sort_report(text).text
}
