//! Common calculation fixtures for tests.

// Well-formed calculations
pub const SIMPLE_AGGREGATE: &str = "SUM([Sales])";
pub const SIMPLE_IF: &str = "IF [A] THEN 1 ELSE 2 END";
pub const PROFIT_RATIO: &str = "[Profit Ratio]: SUM([Profit]) / SUM([Sales])";

pub const TIERED_IF: &str = r#"
IF [Sales] > 1000 THEN "High"
ELSEIF [Sales] > 500 THEN "Medium"
ELSE "Low"
END
"#;

pub const REGION_CASE: &str = r#"
CASE [Region]
WHEN "East" THEN 1
WHEN "West" THEN 2
ELSE 0
END
"#;

pub const FIXED_LOD: &str = "{FIXED [Customer ID] : MIN([Order Date])}";

pub const COMMENTED: &str = r#"
// First purchase per customer
/* SUM([Ignored]) */
{FIXED [Customer ID] : MIN([Order Date])}
"#;

/// Four levels of IF, one past the default limit.
pub const DEEPLY_NESTED: &str = r#"
IF [A] THEN
  IF [B] THEN
    IF [C] THEN
      IF [D] THEN 1 ELSE 2 END
    ELSE 3 END
  ELSE 4 END
ELSE 5 END
"#;
