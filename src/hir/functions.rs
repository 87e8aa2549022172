//! Function signature table.
//!
//! Maps uppercase function names to their accepted argument counts plus the
//! syntax line and description shown by completion and signature help. The
//! table is read-only once built and can be shared freely across threads.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;
use thiserror::Error;

// ============================================================================
// SIGNATURES
// ============================================================================

/// Broad grouping used for completion details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionCategory {
    Aggregate,
    Logical,
    String,
    Date,
    Number,
    TypeConversion,
    TableCalculation,
    User,
    /// Keyword constructs (IF, CASE, LOD scopes) listed for completeness.
    Construct,
}

impl FunctionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionCategory::Aggregate => "aggregate",
            FunctionCategory::Logical => "logical",
            FunctionCategory::String => "string",
            FunctionCategory::Date => "date",
            FunctionCategory::Number => "number",
            FunctionCategory::TypeConversion => "type conversion",
            FunctionCategory::TableCalculation => "table calculation",
            FunctionCategory::User => "user",
            FunctionCategory::Construct => "construct",
        }
    }
}

/// Accepted argument counts and documentation for one function.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionSignature {
    /// Uppercase name.
    pub name: SmolStr,
    pub min: u32,
    /// `None` for variadic constructs.
    pub max: Option<u32>,
    pub syntax: SmolStr,
    pub description: SmolStr,
    pub category: FunctionCategory,
}

impl FunctionSignature {
    pub fn new(name: impl AsRef<str>, min: u32, max: Option<u32>) -> Self {
        let name = SmolStr::new(name.as_ref().trim().to_ascii_uppercase());
        Self {
            syntax: SmolStr::new(format!("{name}(...)")),
            name,
            min,
            max,
            description: SmolStr::default(),
            category: FunctionCategory::Logical,
        }
    }

    pub fn with_syntax(mut self, syntax: impl Into<SmolStr>) -> Self {
        self.syntax = syntax.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<SmolStr>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: FunctionCategory) -> Self {
        self.category = category;
        self
    }

    /// Whether `count` arguments are allowed.
    pub fn accepts(&self, count: usize) -> bool {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    /// The allowed range as shown in diagnostics: `"N"`, `"N+"` or `"N-M"`.
    pub fn arity_label(&self) -> String {
        match self.max {
            None => format!("{}+", self.min),
            Some(max) if max == self.min => max.to_string(),
            Some(max) => format!("{}-{}", self.min, max),
        }
    }

    /// Parameter names parsed from the syntax line, e.g. `LEFT(string, n)`.
    pub fn parameters(&self) -> Vec<&str> {
        let Some(open) = self.syntax.find('(') else {
            return Vec::new();
        };
        let close = self.syntax.rfind(')').unwrap_or(self.syntax.len());
        if close <= open + 1 {
            return Vec::new();
        }
        self.syntax[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// Errors raised while loading a caller-supplied signature table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("function table is empty")]
    Empty,

    #[error("function entry {index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate function entry: {0}")]
    Duplicate(SmolStr),

    #[error("function {name} has min {min} greater than max {max}")]
    InvalidArity { name: SmolStr, min: u32, max: u32 },
}

/// Case-insensitive, insertion-ordered lookup of function signatures.
#[derive(Clone, Debug)]
pub struct FunctionTable {
    entries: IndexMap<SmolStr, FunctionSignature, FxBuildHasher>,
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FunctionTable {
    /// The built-in function library.
    pub fn builtin() -> Self {
        let mut entries = IndexMap::with_capacity_and_hasher(BUILTIN.len(), FxBuildHasher);
        for &(name, min, max, syntax, description, category) in BUILTIN {
            let signature = FunctionSignature::new(name, min, max)
                .with_syntax(syntax)
                .with_description(description)
                .with_category(category);
            entries.insert(signature.name.clone(), signature);
        }
        Self { entries }
    }

    /// Build a table from externally supplied signatures.
    pub fn from_entries(
        signatures: impl IntoIterator<Item = FunctionSignature>,
    ) -> Result<Self, TableError> {
        let mut entries = IndexMap::with_hasher(FxBuildHasher);
        for (index, mut signature) in signatures.into_iter().enumerate() {
            signature.name = SmolStr::new(signature.name.trim().to_ascii_uppercase());
            if signature.name.is_empty() {
                return Err(TableError::EmptyName { index });
            }
            match signature.max {
                Some(max) if max < signature.min => {
                    return Err(TableError::InvalidArity {
                        name: signature.name,
                        min: signature.min,
                        max,
                    });
                }
                _ => {}
            }
            if entries.contains_key(&signature.name) {
                return Err(TableError::Duplicate(signature.name));
            }
            entries.insert(signature.name.clone(), signature);
        }
        if entries.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { entries })
    }

    /// Case-insensitive lookup. A miss is a normal outcome.
    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        if name.bytes().any(|b| b.is_ascii_lowercase()) {
            self.entries.get(name.to_ascii_uppercase().as_str())
        } else {
            self.entries.get(name)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Signatures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.entries.values()
    }
}

// ============================================================================
// BUILT-IN LIBRARY
// ============================================================================

type Entry = (
    &'static str,
    u32,
    Option<u32>,
    &'static str,
    &'static str,
    FunctionCategory,
);

use FunctionCategory::{
    Aggregate, Construct, Date, Logical, Number, String as Str, TableCalculation, TypeConversion,
    User,
};

#[rustfmt::skip]
const BUILTIN: &[Entry] = &[
    // Aggregate
    ("SUM", 1, Some(1), "SUM(expression)", "Returns the sum of all values in the expression.", Aggregate),
    ("AVG", 1, Some(1), "AVG(expression)", "Returns the average of all values in the expression.", Aggregate),
    ("MIN", 1, Some(2), "MIN(expression, [expression2])", "Returns the minimum of an expression, or the smaller of two values.", Aggregate),
    ("MAX", 1, Some(2), "MAX(expression, [expression2])", "Returns the maximum of an expression, or the larger of two values.", Aggregate),
    ("COUNT", 1, Some(1), "COUNT(expression)", "Returns the number of non-null items.", Aggregate),
    ("COUNTD", 1, Some(1), "COUNTD(expression)", "Returns the number of distinct items.", Aggregate),
    ("MEDIAN", 1, Some(1), "MEDIAN(expression)", "Returns the median of the expression.", Aggregate),
    ("ATTR", 1, Some(1), "ATTR(expression)", "Returns the value if all rows share it, otherwise an asterisk.", Aggregate),
    ("STDEV", 1, Some(1), "STDEV(expression)", "Returns the sample standard deviation.", Aggregate),
    ("STDEVP", 1, Some(1), "STDEVP(expression)", "Returns the population standard deviation.", Aggregate),
    ("VAR", 1, Some(1), "VAR(expression)", "Returns the sample variance.", Aggregate),
    ("VARP", 1, Some(1), "VARP(expression)", "Returns the population variance.", Aggregate),
    ("PERCENTILE", 2, Some(2), "PERCENTILE(expression, number)", "Returns the value at the given percentile.", Aggregate),
    ("CORR", 2, Some(2), "CORR(expression1, expression2)", "Returns the Pearson correlation coefficient of two expressions.", Aggregate),
    ("COVAR", 2, Some(2), "COVAR(expression1, expression2)", "Returns the sample covariance of two expressions.", Aggregate),
    ("COVARP", 2, Some(2), "COVARP(expression1, expression2)", "Returns the population covariance of two expressions.", Aggregate),
    ("COLLECT", 1, Some(1), "COLLECT(spatial)", "Combines the values in the argument field.", Aggregate),
    // Logical
    ("IIF", 3, Some(4), "IIF(test, then, else, [unknown])", "Returns then when test is true, else when false, unknown when null.", Logical),
    ("IFNULL", 2, Some(2), "IFNULL(expression1, expression2)", "Returns expression1 if it is not null, otherwise expression2.", Logical),
    ("ISNULL", 1, Some(1), "ISNULL(expression)", "Returns true if the expression is null.", Logical),
    ("ZN", 1, Some(1), "ZN(expression)", "Returns the expression, or zero when it is null.", Logical),
    ("ISDATE", 1, Some(1), "ISDATE(string)", "Returns true if the string is a valid date.", Logical),
    // String
    ("LEFT", 2, Some(2), "LEFT(string, number)", "Returns the leftmost number of characters.", Str),
    ("RIGHT", 2, Some(2), "RIGHT(string, number)", "Returns the rightmost number of characters.", Str),
    ("MID", 2, Some(3), "MID(string, start, [length])", "Returns characters from the middle of a string.", Str),
    ("LEN", 1, Some(1), "LEN(string)", "Returns the length of the string.", Str),
    ("UPPER", 1, Some(1), "UPPER(string)", "Returns the string in uppercase.", Str),
    ("LOWER", 1, Some(1), "LOWER(string)", "Returns the string in lowercase.", Str),
    ("PROPER", 1, Some(1), "PROPER(string)", "Capitalizes the first letter of each word.", Str),
    ("TRIM", 1, Some(1), "TRIM(string)", "Removes leading and trailing spaces.", Str),
    ("LTRIM", 1, Some(1), "LTRIM(string)", "Removes leading spaces.", Str),
    ("RTRIM", 1, Some(1), "RTRIM(string)", "Removes trailing spaces.", Str),
    ("REPLACE", 3, Some(3), "REPLACE(string, substring, replacement)", "Replaces every occurrence of substring.", Str),
    ("CONTAINS", 2, Some(2), "CONTAINS(string, substring)", "Returns true if the string contains substring.", Str),
    ("STARTSWITH", 2, Some(2), "STARTSWITH(string, substring)", "Returns true if the string starts with substring.", Str),
    ("ENDSWITH", 2, Some(2), "ENDSWITH(string, substring)", "Returns true if the string ends with substring.", Str),
    ("FIND", 2, Some(3), "FIND(string, substring, [start])", "Returns the position of substring, or 0 if not found.", Str),
    ("FINDNTH", 3, Some(3), "FINDNTH(string, substring, occurrence)", "Returns the position of the nth occurrence of substring.", Str),
    ("SPLIT", 3, Some(3), "SPLIT(string, delimiter, token number)", "Returns one token of a delimited string.", Str),
    ("SPACE", 1, Some(1), "SPACE(number)", "Returns a string of repeated spaces.", Str),
    ("ASCII", 1, Some(1), "ASCII(string)", "Returns the code of the first character.", Str),
    ("CHAR", 1, Some(1), "CHAR(number)", "Returns the character for a code.", Str),
    ("REGEXP_MATCH", 2, Some(2), "REGEXP_MATCH(string, pattern)", "Returns true if the pattern matches.", Str),
    ("REGEXP_EXTRACT", 2, Some(2), "REGEXP_EXTRACT(string, pattern)", "Returns the part of the string matching the pattern.", Str),
    ("REGEXP_EXTRACT_NTH", 3, Some(3), "REGEXP_EXTRACT_NTH(string, pattern, index)", "Returns the nth capture group of the pattern.", Str),
    ("REGEXP_REPLACE", 3, Some(3), "REGEXP_REPLACE(string, pattern, replacement)", "Replaces matches of the pattern.", Str),
    // Date
    ("DATEADD", 3, Some(3), "DATEADD(date_part, interval, date)", "Adds an interval to a date.", Date),
    ("DATEDIFF", 3, Some(4), "DATEDIFF(date_part, start_date, end_date, [start_of_week])", "Returns the difference between two dates.", Date),
    ("DATENAME", 2, Some(3), "DATENAME(date_part, date, [start_of_week])", "Returns a date part as a string.", Date),
    ("DATEPART", 2, Some(3), "DATEPART(date_part, date, [start_of_week])", "Returns a date part as an integer.", Date),
    ("DATETRUNC", 2, Some(3), "DATETRUNC(date_part, date, [start_of_week])", "Truncates a date to the given part.", Date),
    ("DATEPARSE", 2, Some(2), "DATEPARSE(format, string)", "Converts a string to a date using a format.", Date),
    ("MAKEDATE", 3, Some(3), "MAKEDATE(year, month, day)", "Builds a date from its parts.", Date),
    ("MAKEDATETIME", 2, Some(2), "MAKEDATETIME(date, time)", "Combines a date and a time.", Date),
    ("MAKETIME", 3, Some(3), "MAKETIME(hour, minute, second)", "Builds a time from its parts.", Date),
    ("DAY", 1, Some(1), "DAY(date)", "Returns the day of the month.", Date),
    ("WEEK", 1, Some(1), "WEEK(date)", "Returns the week of the year.", Date),
    ("MONTH", 1, Some(1), "MONTH(date)", "Returns the month.", Date),
    ("QUARTER", 1, Some(1), "QUARTER(date)", "Returns the quarter.", Date),
    ("YEAR", 1, Some(1), "YEAR(date)", "Returns the year.", Date),
    ("TODAY", 0, Some(0), "TODAY()", "Returns the current date.", Date),
    ("NOW", 0, Some(0), "NOW()", "Returns the current date and time.", Date),
    // Number
    ("ABS", 1, Some(1), "ABS(number)", "Returns the absolute value.", Number),
    ("ROUND", 1, Some(2), "ROUND(number, [decimals])", "Rounds to the given number of decimals.", Number),
    ("CEILING", 1, Some(1), "CEILING(number)", "Rounds up to the nearest integer.", Number),
    ("FLOOR", 1, Some(1), "FLOOR(number)", "Rounds down to the nearest integer.", Number),
    ("SQRT", 1, Some(1), "SQRT(number)", "Returns the square root.", Number),
    ("SQUARE", 1, Some(1), "SQUARE(number)", "Returns the square.", Number),
    ("POWER", 2, Some(2), "POWER(number, power)", "Raises a number to a power.", Number),
    ("EXP", 1, Some(1), "EXP(number)", "Returns e raised to the number.", Number),
    ("LN", 1, Some(1), "LN(number)", "Returns the natural logarithm.", Number),
    ("LOG", 1, Some(2), "LOG(number, [base])", "Returns the logarithm, base 10 by default.", Number),
    ("SIGN", 1, Some(1), "SIGN(number)", "Returns -1, 0 or 1.", Number),
    ("DIV", 2, Some(2), "DIV(integer1, integer2)", "Returns the integer part of a division.", Number),
    ("PI", 0, Some(0), "PI()", "Returns the constant pi.", Number),
    ("SIN", 1, Some(1), "SIN(number)", "Returns the sine of an angle in radians.", Number),
    ("COS", 1, Some(1), "COS(number)", "Returns the cosine of an angle in radians.", Number),
    ("TAN", 1, Some(1), "TAN(number)", "Returns the tangent of an angle in radians.", Number),
    ("COT", 1, Some(1), "COT(number)", "Returns the cotangent of an angle in radians.", Number),
    ("ASIN", 1, Some(1), "ASIN(number)", "Returns the arc sine in radians.", Number),
    ("ACOS", 1, Some(1), "ACOS(number)", "Returns the arc cosine in radians.", Number),
    ("ATAN", 1, Some(1), "ATAN(number)", "Returns the arc tangent in radians.", Number),
    ("ATAN2", 2, Some(2), "ATAN2(y, x)", "Returns the arc tangent of y/x in radians.", Number),
    ("DEGREES", 1, Some(1), "DEGREES(number)", "Converts radians to degrees.", Number),
    ("RADIANS", 1, Some(1), "RADIANS(number)", "Converts degrees to radians.", Number),
    ("HEXBINX", 2, Some(2), "HEXBINX(x, y)", "Maps a point to the x coordinate of the nearest hexagonal bin.", Number),
    ("HEXBINY", 2, Some(2), "HEXBINY(x, y)", "Maps a point to the y coordinate of the nearest hexagonal bin.", Number),
    // Type conversion
    ("STR", 1, Some(1), "STR(expression)", "Converts the expression to a string.", TypeConversion),
    ("INT", 1, Some(1), "INT(expression)", "Converts the expression to an integer.", TypeConversion),
    ("FLOAT", 1, Some(1), "FLOAT(expression)", "Converts the expression to a floating point number.", TypeConversion),
    ("DATE", 1, Some(1), "DATE(expression)", "Converts the expression to a date.", TypeConversion),
    ("DATETIME", 1, Some(1), "DATETIME(expression)", "Converts the expression to a date and time.", TypeConversion),
    // Table calculations
    ("RUNNING_SUM", 1, Some(1), "RUNNING_SUM(expression)", "Returns the running sum.", TableCalculation),
    ("RUNNING_AVG", 1, Some(1), "RUNNING_AVG(expression)", "Returns the running average.", TableCalculation),
    ("RUNNING_COUNT", 1, Some(1), "RUNNING_COUNT(expression)", "Returns the running count.", TableCalculation),
    ("RUNNING_MAX", 1, Some(1), "RUNNING_MAX(expression)", "Returns the running maximum.", TableCalculation),
    ("RUNNING_MIN", 1, Some(1), "RUNNING_MIN(expression)", "Returns the running minimum.", TableCalculation),
    ("WINDOW_SUM", 1, Some(3), "WINDOW_SUM(expression, [start], [end])", "Returns the sum within the window.", TableCalculation),
    ("WINDOW_AVG", 1, Some(3), "WINDOW_AVG(expression, [start], [end])", "Returns the average within the window.", TableCalculation),
    ("WINDOW_COUNT", 1, Some(3), "WINDOW_COUNT(expression, [start], [end])", "Returns the count within the window.", TableCalculation),
    ("WINDOW_MAX", 1, Some(3), "WINDOW_MAX(expression, [start], [end])", "Returns the maximum within the window.", TableCalculation),
    ("WINDOW_MIN", 1, Some(3), "WINDOW_MIN(expression, [start], [end])", "Returns the minimum within the window.", TableCalculation),
    ("WINDOW_MEDIAN", 1, Some(3), "WINDOW_MEDIAN(expression, [start], [end])", "Returns the median within the window.", TableCalculation),
    ("LOOKUP", 2, Some(2), "LOOKUP(expression, offset)", "Returns the value at an offset from the current row.", TableCalculation),
    ("PREVIOUS_VALUE", 1, Some(1), "PREVIOUS_VALUE(expression)", "Returns the value of this calculation in the previous row.", TableCalculation),
    ("INDEX", 0, Some(0), "INDEX()", "Returns the index of the current row.", TableCalculation),
    ("FIRST", 0, Some(0), "FIRST()", "Returns the offset to the first row of the partition.", TableCalculation),
    ("LAST", 0, Some(0), "LAST()", "Returns the offset to the last row of the partition.", TableCalculation),
    ("SIZE", 0, Some(0), "SIZE()", "Returns the number of rows in the partition.", TableCalculation),
    ("TOTAL", 1, Some(1), "TOTAL(expression)", "Returns the total for the partition.", TableCalculation),
    ("RANK", 1, Some(2), "RANK(expression, ['asc' | 'desc'])", "Returns the competition rank.", TableCalculation),
    ("RANK_DENSE", 1, Some(2), "RANK_DENSE(expression, ['asc' | 'desc'])", "Returns the dense rank.", TableCalculation),
    ("RANK_MODIFIED", 1, Some(2), "RANK_MODIFIED(expression, ['asc' | 'desc'])", "Returns the modified competition rank.", TableCalculation),
    ("RANK_PERCENTILE", 1, Some(2), "RANK_PERCENTILE(expression, ['asc' | 'desc'])", "Returns the percentile rank.", TableCalculation),
    ("RANK_UNIQUE", 1, Some(2), "RANK_UNIQUE(expression, ['asc' | 'desc'])", "Returns the unique rank.", TableCalculation),
    ("SCRIPT_BOOL", 2, None, "SCRIPT_BOOL(script, expression, ...)", "Runs an external script returning booleans.", TableCalculation),
    ("SCRIPT_INT", 2, None, "SCRIPT_INT(script, expression, ...)", "Runs an external script returning integers.", TableCalculation),
    ("SCRIPT_REAL", 2, None, "SCRIPT_REAL(script, expression, ...)", "Runs an external script returning real numbers.", TableCalculation),
    ("SCRIPT_STR", 2, None, "SCRIPT_STR(script, expression, ...)", "Runs an external script returning strings.", TableCalculation),
    // User
    ("USERNAME", 0, Some(0), "USERNAME()", "Returns the user name of the current user.", User),
    ("FULLNAME", 0, Some(0), "FULLNAME()", "Returns the full name of the current user.", User),
    ("USERDOMAIN", 0, Some(0), "USERDOMAIN()", "Returns the domain of the current user.", User),
    ("ISMEMBEROF", 1, Some(1), "ISMEMBEROF(group)", "Returns true if the current user belongs to the group.", User),
    // Keyword constructs
    ("IF", 1, None, "IF test THEN value [ELSEIF test THEN value] [ELSE value] END", "Evaluates tests in order and returns the first matching value.", Construct),
    ("CASE", 1, None, "CASE expression WHEN value THEN result [ELSE result] END", "Compares an expression against a list of values.", Construct),
    ("FIXED", 1, None, "{FIXED [dimension] : aggregate}", "Computes an aggregate at the listed dimensions only.", Construct),
    ("INCLUDE", 1, None, "{INCLUDE [dimension] : aggregate}", "Computes an aggregate including the listed dimensions.", Construct),
    ("EXCLUDE", 1, None, "{EXCLUDE [dimension] : aggregate}", "Computes an aggregate excluding the listed dimensions.", Construct),
];
