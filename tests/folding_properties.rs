//! Property tests for constant folding and comparison canonicalization

use achievement_triggers::{
    ComparisonOperation, Expression, ExpressionKind, FieldSize, InterpreterScope, MathematicOperation,
    MemoryAccessor,
};
use proptest::prelude::*;

fn fold(left: Expression, operation: MathematicOperation, right: Expression) -> Expression {
    let scope = InterpreterScope::new();
    Expression::mathematic(left, operation, right)
        .evaluate(&scope)
        .expect("folding integers never fails for these operators")
}

fn arb_wrapping_operation() -> impl Strategy<Value = MathematicOperation> {
    prop_oneof![
        Just(MathematicOperation::Add),
        Just(MathematicOperation::Subtract),
        Just(MathematicOperation::Multiply),
        Just(MathematicOperation::BitwiseAnd),
        Just(MathematicOperation::BitwiseXor),
    ]
}

fn arb_comparison() -> impl Strategy<Value = ComparisonOperation> {
    prop_oneof![
        Just(ComparisonOperation::Equal),
        Just(ComparisonOperation::NotEqual),
        Just(ComparisonOperation::GreaterThan),
        Just(ComparisonOperation::GreaterOrEqual),
        Just(ComparisonOperation::LessThan),
        Just(ComparisonOperation::LessOrEqual),
    ]
}

proptest! {
    #[test]
    fn signed_arithmetic_wraps(a in any::<i32>(), b in any::<i32>()) {
        prop_assert_eq!(
            fold(Expression::integer(a), MathematicOperation::Add, Expression::integer(b)),
            Expression::integer(a.wrapping_add(b))
        );
        prop_assert_eq!(
            fold(Expression::integer(a), MathematicOperation::Subtract, Expression::integer(b)),
            Expression::integer(a.wrapping_sub(b))
        );
        prop_assert_eq!(
            fold(Expression::integer(a), MathematicOperation::Multiply, Expression::integer(b)),
            Expression::integer(a.wrapping_mul(b))
        );
    }

    #[test]
    fn unsigned_is_contagious(
        a in any::<u32>(),
        b in any::<i32>(),
        operation in arb_wrapping_operation(),
        unsigned_left in any::<bool>(),
    ) {
        let (left, right) = if unsigned_left {
            (Expression::unsigned(a), Expression::integer(b))
        } else {
            (Expression::integer(b), Expression::unsigned(a))
        };

        let result = fold(left, operation, right);
        let ExpressionKind::IntegerConstant(constant) = result.kind else {
            return Err(TestCaseError::fail("expected an integer constant"));
        };
        prop_assert!(constant.unsigned);
    }

    #[test]
    fn division_by_zero_fails(a in any::<i32>()) {
        let scope = InterpreterScope::new();
        for operation in [MathematicOperation::Divide, MathematicOperation::Modulus] {
            let err = Expression::mathematic(Expression::integer(a), operation, Expression::integer(0))
                .evaluate(&scope)
                .unwrap_err();
            prop_assert_eq!(err.message, "Division by zero");
        }
    }

    #[test]
    fn literals_end_up_on_the_right(
        value in any::<i32>(),
        address in 0u32..0x10000,
        operation in arb_comparison(),
    ) {
        let scope = InterpreterScope::new();
        let accessor = Expression::memory_accessor(MemoryAccessor::at(FieldSize::Byte, address));
        let result = Expression::comparison(Expression::integer(value), operation, accessor.clone())
            .evaluate(&scope)
            .unwrap();

        prop_assert_eq!(
            result,
            Expression::comparison(accessor, operation.reverse(), Expression::integer(value))
        );
    }

    #[test]
    fn integer_comparisons_fold(a in any::<i32>(), b in any::<i32>(), operation in arb_comparison()) {
        let scope = InterpreterScope::new();
        let result = Expression::comparison(Expression::integer(a), operation, Expression::integer(b))
            .evaluate(&scope)
            .unwrap();
        prop_assert_eq!(result, Expression::boolean(operation.evaluate(a, b)));
    }
}
