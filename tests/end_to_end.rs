// End-to-end import/read scenarios (spec.md §8), exercised through the
// public `Database` API with the crate's own reference `PgnSource` and
// `GameEncoder`/`GameDecoder` implementations standing in for the external
// collaborators spec.md §1 keeps out of scope.

use std::path::{Path, PathBuf};

use scdb::blob_codec::SimpleBlobCodec;
use scdb::pgn_text::TextPgnSource;
use scdb::Database;

struct TempDir(PathBuf);

impl TempDir {
	fn new(name: &str) -> TempDir {
		let mut path = std::env::temp_dir();
		path.push("scdb-test");
		path.push("end_to_end");
		path.push(name);
		if path.exists() {
			std::fs::remove_dir_all(&path).unwrap();
		}
		std::fs::create_dir_all(&path).unwrap();
		TempDir(path)
	}

	fn base(&self) -> PathBuf {
		self.0.join("base")
	}

	fn pgn(&self, name: &str, contents: &str) -> PathBuf {
		let path = self.0.join(name);
		std::fs::write(&path, contents).unwrap();
		path
	}
}

impl Drop for TempDir {
	fn drop(&mut self) {
		if self.0.exists() {
			std::fs::remove_dir_all(&self.0).unwrap();
		}
	}
}

fn read_file(base: &Path, ext: &str) -> Vec<u8> {
	std::fs::read(base.with_extension(ext)).unwrap()
}

fn open_and_load(base: impl AsRef<Path>) -> Database {
	let mut db = Database::open(base);
	db.load_existing().unwrap();
	db
}

#[test]
fn s1_empty_base_single_game_pgn() {
	let dir = TempDir::new("s1");
	let pgn = dir.pgn(
		"one.pgn",
		"[Event \"?\"]\n[White \"Kasparov, G.\"]\n[Black \"Karpov, A.\"]\n[Site \"Moscow\"]\n\
		 [Result \"1-0\"]\n[Date \"1985.09.03\"]\n[Round \"16\"]\n[ECO \"D55\"]\n\n1. e4 e5 1-0\n",
	);

	let mut db = open_and_load(dir.base());
	let source = TextPgnSource;
	let codec = SimpleBlobCodec;
	db.import_pgn_and_save(&pgn, &source, &codec).unwrap();

	let names = read_file(&dir.base(), "dcn");
	assert_eq!(names.len(), 10 + 2 * 36);
	let sites = read_file(&dir.base(), "dcs");
	assert_eq!(sites.len(), 10 + 36);
	let index = read_file(&dir.base(), "dci");
	assert_eq!(index.len(), 10 + 35);
	assert_eq!(index[10], 0x00); // status: live
	assert_eq!(index[10 + 27], 1); // result: WhiteWins
	let year = u16::from_be_bytes([index[10 + 31], index[10 + 32]]);
	assert_eq!(year, 1985);
	assert_eq!(index[10 + 33], 9);
	assert_eq!(index[10 + 34], 3);
	assert_eq!(&index[10 + 28..10 + 31], b"D55");

	let game = db.get_game_at(0, &codec).unwrap().unwrap();
	assert_eq!(game.headers.get("White").map(String::as_str), Some("Kasparov, G."));
	assert_eq!(game.headers.get("Black").map(String::as_str), Some("Karpov, A."));
	assert_eq!(game.headers.get("Site").map(String::as_str), Some("Moscow"));
	assert_eq!(game.headers.get("Result").map(String::as_str), Some("1-0"));
}

#[test]
fn s2_duplicate_player_across_games_shares_offset() {
	let dir = TempDir::new("s2");
	let pgn = dir.pgn(
		"two.pgn",
		"[Event \"?\"]\n[White \"A\"]\n[Black \"B\"]\n[Result \"1-0\"]\n\n1. e4 e5 1-0\n\n\
		 [Event \"?\"]\n[White \"A\"]\n[Black \"C\"]\n[Result \"0-1\"]\n\n1. d4 d5 0-1\n",
	);

	let mut db = open_and_load(dir.base());
	let source = TextPgnSource;
	let codec = SimpleBlobCodec;
	let outcome = db.import_pgn_and_save(&pgn, &source, &codec).unwrap();
	assert_eq!(outcome.games_imported, 2);

	let names = read_file(&dir.base(), "dcn");
	assert_eq!(names.len(), 10 + 3 * 36); // A, B, C

	let game0 = db.get_game_at(0, &codec).unwrap().unwrap();
	let game1 = db.get_game_at(1, &codec).unwrap().unwrap();
	assert_eq!(game0.headers.get("White"), game1.headers.get("White"));
	assert_eq!(game0.headers.get("White").map(String::as_str), Some("A"));
}

#[test]
fn s3_missing_optional_fields_default() {
	let dir = TempDir::new("s3");
	let pgn = dir.pgn(
		"no_optionals.pgn",
		"[Event \"?\"]\n[White \"A\"]\n[Black \"B\"]\n[Result \"*\"]\n\n1. e4 e5 *\n",
	);

	let mut db = open_and_load(dir.base());
	let source = TextPgnSource;
	let codec = SimpleBlobCodec;
	db.import_pgn_and_save(&pgn, &source, &codec).unwrap();

	let index = read_file(&dir.base(), "dci");
	assert_eq!(&index[10 + 17..10 + 19], &[0, 0]); // round
	assert_eq!(&index[10 + 28..10 + 31], &[0, 0, 0]); // eco
	assert_eq!(&index[10 + 31..10 + 33], &[0, 0]); // year

	let game = db.get_game_at(0, &codec).unwrap().unwrap();
	assert_eq!(game.headers.get("Date").map(String::as_str), Some("????.??.??"));
	assert_eq!(game.headers.get("ECO").map(String::as_str), Some(""));
	assert_eq!(game.headers.get("Round").map(String::as_str), Some("?"));
}

#[test]
fn s4_long_site_name_truncates_to_36_bytes() {
	let dir = TempDir::new("s4");
	let long_site = "A".repeat(50);
	let pgn = dir.pgn(
		"long_site.pgn",
		&format!(
			"[Event \"?\"]\n[White \"A\"]\n[Black \"B\"]\n[Site \"{}\"]\n[Result \"*\"]\n\n1. e4 *\n",
			long_site
		),
	);

	let mut db = open_and_load(dir.base());
	let source = TextPgnSource;
	let codec = SimpleBlobCodec;
	db.import_pgn_and_save(&pgn, &source, &codec).unwrap();

	let sites = read_file(&dir.base(), "dcs");
	assert_eq!(&sites[10..10 + 36], "A".repeat(36).as_bytes());

	let game = db.get_game_at(0, &codec).unwrap().unwrap();
	assert_eq!(game.headers.get("Site").map(String::as_str), Some("A".repeat(36).as_str()));
}

#[test]
fn s5_length_prefix_boundary_game_sizes_round_trip() {
	use scdb::external::{GameDecoder, GameEncoder};
	use scdb::game::{Game, Headers};

	let dir = TempDir::new("s5");
	let mut db = open_and_load(dir.base());
	let source = TextPgnSource;
	let codec = SimpleBlobCodec;

	let mut pgn_text = String::new();
	let sizes = [0usize, 126, 127, 255, 256, 65535, 65536];
	for (i, &move_count) in sizes.iter().enumerate() {
		pgn_text.push_str(&format!(
			"[Event \"?\"]\n[White \"W{}\"]\n[Black \"B{}\"]\n[Result \"*\"]\n\n",
			i, i
		));
		for m in 0..move_count {
			pgn_text.push_str(&format!("m{} ", m));
		}
		pgn_text.push_str("*\n\n");
	}
	let pgn = dir.pgn("boundaries.pgn", &pgn_text);

	let outcome = db.import_pgn_and_save(&pgn, &source, &codec).unwrap();
	assert_eq!(outcome.games_imported, sizes.len());

	for (i, &move_count) in sizes.iter().enumerate() {
		let game = db.get_game_at(i, &codec).unwrap().unwrap();
		assert_eq!(game.moves.len(), move_count);
	}

	// Also exercise the codec directly at the exact byte-length boundaries
	// named in spec.md §8 S5, independent of PGN move-token framing.
	for &len in &[0usize, 126, 127, 255, 256, 65535, 65536, 16_777_215, 16_777_216] {
		let moves: Vec<String> = (0..1).map(|_| "x".repeat(len)).collect();
		let game = Game { headers: Headers::new(), moves };
		let blob = codec.encode_game(&game).unwrap();
		let mut decoded = Game { headers: Headers::new(), moves: Vec::new() };
		codec.decode_game(&mut decoded, &blob).unwrap();
		assert_eq!(decoded.moves, game.moves);
	}
}

#[test]
fn s6_reopen_across_restart_does_not_duplicate_shared_player() {
	let dir = TempDir::new("s6");
	let pgn1 = dir.pgn(
		"first.pgn",
		"[Event \"?\"]\n[White \"Shared\"]\n[Black \"First Opponent\"]\n[Result \"1-0\"]\n\n1. e4 1-0\n",
	);
	let pgn2 = dir.pgn(
		"second.pgn",
		"[Event \"?\"]\n[White \"Shared\"]\n[Black \"Second Opponent\"]\n[Result \"0-1\"]\n\n1. d4 0-1\n",
	);

	{
		let mut db = open_and_load(dir.base());
		let source = TextPgnSource;
		let codec = SimpleBlobCodec;
		db.import_pgn_and_save(&pgn1, &source, &codec).unwrap();
	}

	let shared_offset;
	{
		let mut db = open_and_load(dir.base());
		let source = TextPgnSource;
		let codec = SimpleBlobCodec;
		db.import_pgn_and_save(&pgn2, &source, &codec).unwrap();
		assert_eq!(db.count_games(), 2);

		let game0 = db.get_game_at(0, &codec).unwrap().unwrap();
		let game1 = db.get_game_at(1, &codec).unwrap().unwrap();
		assert_eq!(game0.headers.get("White"), game1.headers.get("White"));
		shared_offset = game1.headers.get("White").cloned();
	}

	let names = read_file(&dir.base(), "dcn");
	// Shared, First Opponent, Second Opponent: exactly 3 records, never 4.
	assert_eq!(names.len(), 10 + 3 * 36);
	assert_eq!(shared_offset.as_deref(), Some("Shared"));
}
