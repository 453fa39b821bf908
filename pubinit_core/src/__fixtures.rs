use crate::TypeDeclaration;
use crate::parse;

/// A public struct with a plain constant and an optional variable.
pub const STORED_AND_OPTIONAL: &str = "@PublicInit
public struct Hoge {
    public let index: Int
    var text: String?
}
";

pub const STORED_AND_OPTIONAL_EXPANDED: &str = "public struct Hoge {
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

/// A stored field next to a computed property.
pub const WITH_COMPUTED: &str = "@PublicInit
public struct Square {
    let width: Int
    var area: Int { width * width }
}
";

pub const INTERNAL_CLASS: &str = "@PublicInit
class Service {
    var name: String
}
";

pub const PUBLIC_ENUM: &str = "@PublicInit
public enum Direction {
    case north, south
}
";

/// One field opted out with the exclusion marker, one plain field.
pub const WITH_IGNORED: &str = "@PublicInit
public struct Account {
    @PublicInitIgnored var cache: [String: Int] = [:]
    let id: String
}
";

pub const NESTED: &str = "@PublicInit
public struct Outer {
    let id: Int

    @PublicInit
    public struct Inner {
        let value: String
    }
}
";

pub const NESTED_EXPANDED: &str = "public struct Outer {
    let id: Int

    public struct Inner {
        let value: String

        public init(
            value: String
        ) {
            self.value = value
        }
    }

    public init(
        id: Int
    ) {
        self.id = id
    }
}
";

/// Every kind of member the classifier has to sort out.
pub const MIXED_MEMBERS: &str = "@PublicInit
public final class Theme: NSObject {
    class var shared: Theme { Theme() }
    static let version = 2
    let name: String
    let kind = \"dark\"
    var accent: Color = .blue
    var count = 0 {
        didSet { print(count) }
    }
    @PublicInitEscaping var onChange: (Theme) -> Void
    var fallback: Optional<String>
    var retries = 3, delay = 0.5
    private(set) var isEnabled = true
    var createdAt = Date()

    init(name: String) {
        self.name = name
    }

    func apply() {}
}
";

/// The parameter list synthesized for [`MIXED_MEMBERS`].
pub const MIXED_MEMBERS_PARAMETERS: &str = "name: String,
accent: Color = .blue,
onChange: @escaping (Theme) -> Void,
fallback: Optional<String> = nil,
retries: Int = 3,
delay: Double = 0.5,
isEnabled: Bool = true,
createdAt: Date = Date()";

/// Parse `source` and return its first top level declaration.
pub fn first_declaration(source: &str) -> TypeDeclaration {
	let mut file = parse(source).unwrap_or_else(|e| panic!("parse: {e}"));
	assert!(!file.declarations.is_empty(), "no declaration in {source:?}");
	file.declarations.remove(0)
}

/// Wrap `member` in a public struct body.
pub fn struct_with_member(member: &str) -> String {
	format!("public struct Sample {{\n    {member}\n}}\n")
}
