mod common;

use predicates::prelude::PredicateBooleanExt;
use pubinit_core::AnyEmptyResult;
use similar_asserts::assert_eq;

const MODEL: &str = "@PublicInit
public struct Hoge {
    public let index: Int
    var text: String?
}
";

const MODEL_EXPANDED: &str = "public struct Hoge {
    public let index: Int
    var text: String?

    public init(
        index: Int,
        text: String? = nil
    ) {
        self.index = index
        self.text = text
    }
}
";

#[test]
fn expand_prints_expanded_source() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("Hoge.swift");
	std::fs::write(&file, MODEL)?;

	let output = common::pubinit_cmd()
		.arg("expand")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout)?, MODEL_EXPANDED);
	assert_eq!(std::fs::read_to_string(&file)?, MODEL);

	Ok(())
}

#[test]
fn expand_normalizes_line_endings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("Hoge.swift");
	std::fs::write(&file, MODEL.replace('\n', "\r\n"))?;

	common::pubinit_cmd()
		.arg("expand")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(MODEL_EXPANDED);

	Ok(())
}

#[test]
fn expand_shows_diff() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("Hoge.swift");
	std::fs::write(&file, MODEL)?;

	common::pubinit_cmd()
		.arg("expand")
		.arg(&file)
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("-@PublicInit\n"))
		.stdout(predicates::str::contains("+    public init(\n"))
		.stdout(predicates::str::contains("+        text: String? = nil\n"))
		.stdout(predicates::str::contains("     var text: String?\n"));

	Ok(())
}

#[test]
fn expand_reports_rejected_declaration() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("Service.swift");
	std::fs::write(&file, "@PublicInit\nclass Service {\n    var name: String\n}\n")?;

	common::pubinit_cmd()
		.arg("expand")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout("class Service {\n    var name: String\n}\n")
		.stderr(predicates::str::contains(
			"PublicInit can only be applied to public declarations",
		))
		.stderr(predicates::str::contains("pubinit::not_public"));

	Ok(())
}

#[test]
fn expand_reports_unresolved_member() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("Config.swift");
	std::fs::write(&file, "@PublicInit\npublic struct Config {\n    var name\n}\n")?;

	common::pubinit_cmd()
		.arg("expand")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("cannot infer a parameter type for `name`"))
		.stdout(predicates::str::contains("public init").not());

	Ok(())
}

#[test]
fn expand_uses_configured_aliases() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("pubinit.toml"),
		"[attributes]\nexpand = [\"MemberwiseInit\"]\n\n[format]\nindent = 2\n",
	)?;
	let file = tmp.path().join("Point.swift");
	std::fs::write(&file, "@MemberwiseInit\npublic struct Point {\n  var x = 0.0\n}\n")?;

	common::pubinit_cmd()
		.arg("expand")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			"public struct Point {\n  var x = 0.0\n\n  public init(\n    x: Double = 0.0\n  ) {\n    self.x = x\n  }\n}\n",
		);

	Ok(())
}

#[test]
fn expand_fails_on_unbalanced_source() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("Broken.swift");
	std::fs::write(&file, "@PublicInit\npublic struct Broken {\n")?;

	common::pubinit_cmd()
		.arg("expand")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("pubinit::unbalanced_delimiter"));

	Ok(())
}

#[test]
fn expand_fails_on_missing_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::pubinit_cmd()
		.arg("expand")
		.arg(tmp.path().join("Missing.swift"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2);

	Ok(())
}

#[test]
fn expand_logs_when_verbose() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("Hoge.swift");
	std::fs::write(&file, MODEL)?;

	common::pubinit_cmd()
		.arg("expand")
		.arg(&file)
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("synthesized initializer"));

	Ok(())
}
