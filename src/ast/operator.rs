// Copyright 2024 NeuroML Gates Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Operator definitions for model expressions

/// Binding strength of an expression form (higher = tighter binding)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Ternary conditional `c ? a : b` (right associative)
    Conditional = 1,
    /// Logical OR
    Or = 2,
    /// Logical AND
    And = 3,
    /// Comparisons (`.gt.`, `.eq.`, ...)
    Comparison = 4,
    /// Additive operators (+, -)
    Additive = 5,
    /// Multiplicative operators (*, /)
    Multiplicative = 6,
    /// Prefix operators (-, +, .not.)
    Unary = 7,
    /// Exponentiation (right associative)
    Power = 8,
    /// Literals, identifiers, calls and parenthesized groups
    Primary = 9,
}

impl Precedence {
    /// Get the next higher precedence level for left-associative operators
    #[inline(always)]
    pub const fn next_level(self) -> Self {
        match self {
            Precedence::Conditional => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary => Precedence::Power,
            Precedence::Power => Precedence::Primary,
            Precedence::Primary => Precedence::Primary,
        }
    }
}

/// Operator associativity
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// Left-to-right associativity
    Left,
    /// Right-to-left associativity
    Right,
}

/// Binary operators of the expression grammar
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOperator {
    // Arithmetic operators
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
    /// Exponentiation (^)
    Power,

    // Comparison operators
    /// Greater than (.gt.)
    GreaterThan,
    /// Greater than or equal (.geq.)
    GreaterThanOrEqual,
    /// Less than (.lt.)
    LessThan,
    /// Less than or equal (.leq.)
    LessThanOrEqual,
    /// Equality (.eq.)
    Equal,
    /// Inequality (.neq.)
    NotEqual,

    // Logical operators
    /// Logical AND (.and.)
    And,
    /// Logical OR (.or.)
    Or,
}

/// Unary operators of the expression grammar
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOperator {
    /// Arithmetic negation (-)
    Minus,
    /// Arithmetic positive (+)
    Plus,
    /// Logical negation (.not.)
    Not,
}

impl BinaryOperator {
    /// Get the precedence of this operator
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Power => Precedence::Power,
            Self::Multiply | Self::Divide => Precedence::Multiplicative,
            Self::Add | Self::Subtract => Precedence::Additive,
            Self::GreaterThan
            | Self::GreaterThanOrEqual
            | Self::LessThan
            | Self::LessThanOrEqual
            | Self::Equal
            | Self::NotEqual => Precedence::Comparison,
            Self::And => Precedence::And,
            Self::Or => Precedence::Or,
        }
    }

    /// Get the associativity of this operator
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Power => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Symbolic spelling shared by the C-like notations
    pub fn as_symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Spelling in the modeling language (dotted comparison and logic keywords)
    pub fn as_lems(&self) -> &'static str {
        match self {
            Self::GreaterThan => ".gt.",
            Self::GreaterThanOrEqual => ".geq.",
            Self::LessThan => ".lt.",
            Self::LessThanOrEqual => ".leq.",
            Self::Equal => ".eq.",
            Self::NotEqual => ".neq.",
            Self::And => ".and.",
            Self::Or => ".or.",
            _ => self.as_symbol(),
        }
    }
}

impl UnaryOperator {
    /// Symbolic spelling shared by the C-like notations
    pub fn as_symbol(&self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Not => "!",
        }
    }

    /// Spelling in the modeling language
    pub fn as_lems(&self) -> &'static str {
        match self {
            Self::Not => ".not. ",
            _ => self.as_symbol(),
        }
    }

    /// Get the precedence of this operator
    pub fn precedence(&self) -> Precedence {
        Precedence::Unary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_operator_precedence() {
        assert!(BinaryOperator::Power.precedence() > BinaryOperator::Multiply.precedence());
        assert!(BinaryOperator::Multiply.precedence() > BinaryOperator::Add.precedence());
        assert!(BinaryOperator::Add.precedence() > BinaryOperator::GreaterThan.precedence());
        assert!(BinaryOperator::GreaterThan.precedence() > BinaryOperator::And.precedence());
        assert!(BinaryOperator::And.precedence() > BinaryOperator::Or.precedence());
        assert!(BinaryOperator::Or.precedence() > Precedence::Conditional);
    }

    #[test]
    fn test_operator_associativity() {
        assert_eq!(BinaryOperator::Subtract.associativity(), Associativity::Left);
        assert_eq!(BinaryOperator::Power.associativity(), Associativity::Right);
    }

    #[test]
    fn test_operator_spellings() {
        assert_eq!(BinaryOperator::GreaterThan.as_lems(), ".gt.");
        assert_eq!(BinaryOperator::GreaterThan.as_symbol(), ">");
        assert_eq!(BinaryOperator::Divide.as_lems(), "/");
        assert_eq!(UnaryOperator::Not.as_lems(), ".not. ");
    }
}
